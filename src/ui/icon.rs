//! Status icons with ASCII fallbacks

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Progress,
    Arrow,
    Deploy,
    Pack,
    Remote,
    Upload,
    Trash,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        if supports_unicode {
            match self {
                Icon::Success => "✓",
                Icon::Error => "✗",
                Icon::Warning => "⚠",
                Icon::Progress => "●",
                Icon::Arrow => "↳",
                Icon::Deploy => "🚀",
                Icon::Pack => "📦",
                Icon::Remote => "📡",
                Icon::Upload => "↑",
                Icon::Trash => "🗑",
            }
        } else {
            match self {
                Icon::Success => "[OK]",
                Icon::Error => "[FAIL]",
                Icon::Warning => "[WARN]",
                Icon::Progress => "[..]",
                Icon::Arrow => "[>]",
                Icon::Deploy => "[DEPLOY]",
                Icon::Pack => "[PACK]",
                Icon::Remote => "[REMOTE]",
                Icon::Upload => "[UP]",
                Icon::Trash => "[DEL]",
            }
        }
    }
}
