use clap::ValueEnum;

/// What to do when a `join` names an identifier another connection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DuplicateJoin {
    /// Last join wins; the previous connection is closed without a `left`.
    #[default]
    Replace,
    /// The newcomer's `join` is dropped and the holder keeps the identifier.
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    pub duplicate_join: DuplicateJoin,
    /// Echo `joined` back to the connection that sent the `join`.
    pub notify_sender_on_join: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            duplicate_join: DuplicateJoin::Replace,
            notify_sender_on_join: true,
        }
    }
}
