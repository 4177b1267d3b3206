use crate::*;
pub use random::*;

mod random;

pub trait FieldGenerator {
    fn generate(self, settings: GameSettings) -> Result<Field>;
}
