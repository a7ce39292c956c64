/// Everything that can drive the `watch` loop forward.
///
/// Sources:
/// - Tick interval        → `Tick`
/// - Config watcher task  → `ConfigReloaded`
/// - Ctrl-C / tick budget → `Shutdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Take one sample and record it.
    Tick,
    /// Config file changed on disk; re-read interval and capacity.
    ConfigReloaded,
    /// Stop sampling and exit.
    Shutdown,
}
