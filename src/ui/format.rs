use std::time::Duration;

pub fn format_bytes_compact(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        return format!("{} B", bytes);
    }
    if b < MB {
        return format!("{:.1} KB", b / KB);
    }
    if b < GB {
        return format!("{:.1} MB", b / MB);
    }
    format!("{:.1} GB", b / GB)
}

/// `done/total (pct%)` for one transfer
pub fn format_progress(bytes_done: u64, bytes_total: u64) -> String {
    let pct = if bytes_total == 0 {
        100
    } else {
        ((bytes_done.min(bytes_total) as u128 * 100) / bytes_total as u128) as u64
    };
    format!(
        "{}/{} ({}%)",
        format_bytes_compact(bytes_done),
        format_bytes_compact(bytes_total),
        pct
    )
}

/// Transfer rate over an elapsed interval, or `--` when unknown
pub fn format_rate(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if bytes == 0 || secs <= 0.0 {
        return "--".to_string();
    }
    let rate = bytes as f64 / secs;
    if !rate.is_finite() {
        return "--".to_string();
    }
    format!("{}/s", format_bytes_rate(rate))
}

fn format_bytes_rate(bytes_per_sec: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes_per_sec < KB {
        return format!("{:.0} B", bytes_per_sec);
    }
    if bytes_per_sec < MB {
        return format!("{:.1} KB", bytes_per_sec / KB);
    }
    if bytes_per_sec < GB {
        return format!("{:.1} MB", bytes_per_sec / MB);
    }
    format!("{:.1} GB", bytes_per_sec / GB)
}

pub fn format_duration_compact(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 1 {
        return format!("{}ms", d.as_millis());
    }
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m{}s", mins, secs % 60);
    }
    format!("{}h{}m", mins / 60, mins % 60)
}
