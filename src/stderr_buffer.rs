use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Start holding warnings back. Used while a table is being written to
/// stdout so fetch warnings do not land in the middle of it.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Stop buffering and return everything collected since `activate`.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .unwrap_or_default()
}

/// Record a warning, or print it straight to stderr when not buffering.
pub fn warn(msg: String) {
    let Ok(mut guard) = BUFFER.lock() else {
        eprintln!("{}", msg);
        return;
    };
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Print all buffered warnings to stderr and stop buffering.
pub fn flush() {
    for msg in drain() {
        eprintln!("{}", msg);
    }
}

/// Like `eprintln!`, but routed through the warning buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_and_drains() {
        activate();
        crate::buffered_eprintln!("first {}", 1);
        warn("second".to_string());
        let drained = drain();
        assert_eq!(drained, vec!["first 1".to_string(), "second".to_string()]);
        assert!(drain().is_empty());
    }
}
