//! 基于角色的路由守卫

use crate::config::ClientConfig;
use crate::notify::Alert;
use crate::session::SessionState;
use farmlink_shared::Role;

pub const ACCESS_DENIED_TITLE: &str = "Access Denied";
pub const ACCESS_DENIED_TEXT: &str = "You do not have permission to view this page.";

/// 守卫对一次访问的裁决
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// 未登录：跳转登录页，并记住原本要去的地址
    RedirectToLogin { login_path: String, return_to: String },
    /// 已登录但角色未知，用户详情仍在拉取中
    Loading,
    /// 角色不在允许列表内：提示后跳转公开页面
    Denied { fallback: String, notice: Alert },
    Render,
}

/// 路由守卫
///
/// 纯函数：输入会话状态和允许列表，输出裁决。
/// 跳转和提示由调用方（前端路由器）根据裁决执行。
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    fallback_path: String,
}

impl RouteGuard {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            fallback_path: config.fallback_path.clone(),
        }
    }

    /// `allowed` 为空时任何角色都无法进入
    pub fn check(&self, session: &SessionState, allowed: &[Role], destination: &str) -> GuardDecision {
        if !session.is_authenticated {
            return GuardDecision::RedirectToLogin {
                login_path: self.login_path.clone(),
                return_to: destination.to_string(),
            };
        }

        let Some(role) = session.role() else {
            return GuardDecision::Loading;
        };

        if !allowed.contains(&role) {
            log::info!("role {} denied access to {}", role, destination);
            return GuardDecision::Denied {
                fallback: self.fallback_path.clone(),
                notice: Alert::error(ACCESS_DENIED_TITLE, ACCESS_DENIED_TEXT),
            };
        }

        GuardDecision::Render
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}
