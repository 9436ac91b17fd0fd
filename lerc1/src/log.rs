//! Diagnostics that go to the `log` crate when the `logging` feature is
//! enabled and compile to nothing otherwise.

/// Forward to the `log` macro named `$level`.
///
/// Without logging the arguments are still borrowed, so that values that only
/// exist for a message don't trigger unused warnings.
macro_rules! forward {
    ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        #[cfg(feature = "logging")]
        ::log::$level!($fmt $(, $arg)*);
        #[cfg(not(feature = "logging"))]
        { $(let _ = &$arg;)* }
    };
}

/// Header summaries and mask construction.
macro_rules! ldebug {
    ($($tt:tt)*) => {
        $crate::log::forward!(debug, $($tt)*)
    };
}

/// Per-block decoding.
macro_rules! ltrace {
    ($($tt:tt)*) => {
        $crate::log::forward!(trace, $($tt)*)
    };
}

/// Blobs that fail to open or decode.
macro_rules! lwarn {
    ($($tt:tt)*) => {
        $crate::log::forward!(warn, $($tt)*)
    };
}

pub(crate) use forward;
pub(crate) use ldebug;
pub(crate) use ltrace;
pub(crate) use lwarn;
