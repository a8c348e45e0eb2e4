pub mod apply;
pub mod diff;
pub mod hash;
pub mod record;
pub mod replay;
