use thiserror::Error;

use crate::surface::SurfaceError;
use crate::thought::model::ThoughtId;

/// Message shown when a thought is submitted without a name.
pub const EMPTY_NAME_MESSAGE: &str = "This is philosophy. Give your thought a name.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhilosophyError {
    #[error("{}", EMPTY_NAME_MESSAGE)]
    EmptyName,
    #[error("drawing failed: {0}")]
    Collaborator(#[from] SurfaceError),
    #[error("thought {0} is already drawn")]
    AlreadyDrawn(ThoughtId),
    #[error("thought {0} has been un-thought")]
    Unthought(ThoughtId),
    #[error("thought {0} has no visual binding")]
    NotDrawn(ThoughtId),
    #[error("no live thought with id {0}")]
    UnknownThought(ThoughtId),
}

pub type Result<T, E = PhilosophyError> = std::result::Result<T, E>;
