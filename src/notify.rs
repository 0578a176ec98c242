//! 面向用户的提示（对应浏览器里的阻塞式弹窗）

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub text: String,
}

impl Alert {
    pub fn new(level: AlertLevel, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(AlertLevel::Success, title, text)
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(AlertLevel::Warning, title, text)
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(AlertLevel::Error, title, text)
    }

    /// 错误提示需要用户手动关闭
    pub fn is_blocking(&self) -> bool {
        self.level != AlertLevel::Success
    }
}

pub trait Notifier {
    fn notify(&self, alert: Alert);
}
