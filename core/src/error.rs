use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Field size out of bounds")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Too few mines")]
    TooFewMines,
    #[error("Field shape does not match declared size")]
    InvalidBoardShape,
    #[error("Cell marker above the mine sentinel")]
    InvalidMarker,
    #[error("Malformed game settings")]
    MalformedSettings,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
