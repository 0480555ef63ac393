//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so debug
//! builds stay readable. Every flag is further gated by `cfg(debug_assertions)`
//! at the call site.

pub struct DebugFlags {
    /// Emit per-indicator add/remove details (labels, handles, point counts).
    pub print_indicator_events: bool,
    /// Emit one line per realtime tick (time and close of the appended bar).
    pub print_realtime_ticks: bool,
    /// Emit the number of rows every time a legend is projected.
    pub print_legend_updates: bool,
    /// Emit every call the headless renderer receives.
    pub print_render_calls: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_indicator_events: true,
    print_realtime_ticks: false,
    print_legend_updates: false,
    print_render_calls: false,
};
