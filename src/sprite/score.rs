use crate::engine::stage::{NodeId, Stage, Text, TextStyle};
use crate::engine::ticker::Updatable;
use crate::engine::Point;
use crate::state::World;

// right edge of the text, it grows to the left
const SCORE_POSITION: Point = Point { x: 780.0, y: 10.0 };
const SCORE_STYLE: TextStyle = TextStyle {
    font: "46px arcade",
    fill: "white",
    align: "right",
};

pub struct ScoreCounter {
    node: NodeId,
}

impl ScoreCounter {
    pub fn spawn(stage: &mut Stage) -> Self {
        let node = stage.add(Text {
            content: String::new(),
            position: SCORE_POSITION,
            style: SCORE_STYLE,
        });
        ScoreCounter { node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Updatable<World> for ScoreCounter {
    fn update(&mut self, world: &mut World) {
        world.state.score.advance();
        if let (Some(display), Some(text)) = (
            world.state.score.display(),
            world.stage.text_mut(self.node),
        ) {
            text.content = display;
        }
    }
}
