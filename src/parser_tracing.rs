use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_static::lazy_static;

lazy_static! {
    static ref ENABLED: bool = std::env::var_os("BASED_TRACE_PARSER").is_some();
}

static TRACE_LEVEL: AtomicUsize = AtomicUsize::new(0);

const TRACE_INDENT: &str = "\t";

/// Indented BEGIN/END markers around a parse step, printed to stderr while
/// `BASED_TRACE_PARSER` is set. The span closes when the guard drops.
pub struct TraceSpan {
    msg: &'static str,
}

pub fn span(msg: &'static str) -> Option<TraceSpan> {
    if !*ENABLED {
        return None;
    }
    let level = TRACE_LEVEL.fetch_add(1, Ordering::Relaxed);
    eprintln!("{}BEGIN {}", TRACE_INDENT.repeat(level), msg);
    Some(TraceSpan { msg })
}

impl Drop for TraceSpan {
    fn drop(&mut self) {
        let level = TRACE_LEVEL.fetch_sub(1, Ordering::Relaxed);
        eprintln!("{}END {}", TRACE_INDENT.repeat(level.saturating_sub(1)), self.msg);
    }
}
