//! Logging that forwards to the `log` crate if the `logging` feature is
//! enabled, and compiles to nothing otherwise.

macro_rules! log_at {
    ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "logging")]
        ::log::$level!($fmt $(, $arg)*);
        // Keep the arguments used, so that disabling logging doesn't cause
        // warnings.
        #[cfg(not(feature = "logging"))]
        {
            $(let _ = &$arg;)*
        }
    }};
}

macro_rules! ldebug {
    ($($args:tt)*) => {
        log_at!(debug, $($args)*)
    };
}

macro_rules! ltrace {
    ($($args:tt)*) => {
        log_at!(trace, $($args)*)
    };
}

macro_rules! lwarn {
    ($($args:tt)*) => {
        log_at!(warn, $($args)*)
    };
}
