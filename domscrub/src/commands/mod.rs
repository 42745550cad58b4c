// domscrub/src/commands/mod.rs
pub mod scrub;
