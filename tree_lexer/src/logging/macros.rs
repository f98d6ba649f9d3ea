//! Logging macros. Context values accept any `Display` type.

/// Collect `"key" => value` pairs into owned strings
#[doc(hidden)]
#[macro_export]
macro_rules! __log_context {
    ($($key:expr => $value:expr),*) => {
        vec![$(($key, format!("{}", $value))),*]
    };
}

/// Log error with a [`Code`](crate::logging::Code), optional span and context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_error_with_context($code, $message, Some($span), vec![])
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_error_with_context($code, $message, Some($span), context_refs)
    }};

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_error_with_context($code, $message, None, context_refs)
    }};
}

/// Log success with a code and context
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_success_with_context($code, $message, context_refs)
    }};
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_info_with_context($message, context_refs)
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_warning_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {{
        let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
        let context_refs: Vec<(&str, &str)> =
            context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
        $crate::logging::log_warning_with_context($message, context_refs)
    }};
}

/// Log debug message. Context is only formatted when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Debug) {
            $crate::logging::log_debug_with_context($message, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::is_enabled($crate::logging::LogLevel::Debug) {
            let context_strings: Vec<(&str, String)> = $crate::__log_context!($($key => $value),+);
            let context_refs: Vec<(&str, &str)> =
                context_strings.iter().map(|(k, v)| (*k, v.as_str())).collect();
            $crate::logging::log_debug_with_context($message, context_refs)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::{codes, service, with_scoped_logger, LogLevel};
    use crate::utils::{Position, Span};
    use std::sync::Arc;

    #[test]
    fn test_macros_reach_scoped_logger() {
        let (svc, memory) = service::create_memory_service();

        with_scoped_logger(Arc::new(svc), || {
            log_error!(codes::structure::MISMATCHED_BRACES, "Mismatched braces.",
                span = Span::single(Position::start()),
                "depth" => 0
            );
            log_success!(codes::success::TREE_BUILD_COMPLETE, "built", "nodes" => 3);
            log_info!("info");
            log_warning!("warn", "char" => ']');
            log_debug!("debug", "flag" => true);
        });

        let summary = memory.get_summary();
        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.debug_count, 1);

        let error = &memory.get_errors()[0];
        assert!(error.span.is_some());
        assert_eq!(error.context.get("depth").map(String::as_str), Some("0"));
    }

    #[test]
    fn test_debug_skipped_below_level() {
        let memory = Arc::new(crate::logging::MemoryLogger::new());
        let svc = crate::logging::LoggingService::new(memory.clone(), LogLevel::Info);

        with_scoped_logger(Arc::new(svc), || {
            log_debug!("hidden");
        });

        assert_eq!(memory.event_count(), 0);
    }
}
