// Domain models (pure data, no DOM or network types)
pub mod models;
