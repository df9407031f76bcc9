/// Material snapshot export command.
pub mod export;
