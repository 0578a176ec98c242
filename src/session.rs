//! 会话状态机
//!
//! 会话只由 token 存储推导：启动时 `initial_session` 读取一次 token 生成快照，
//! 之后只能通过 `SessionAction` 修改。
//!
//! 每次会话边界（发起登录、登出、任何强制重置）都会递增 `generation`。
//! 异步操作在发起时记下当时的 generation，结果回来时 generation 不一致就被丢弃，
//! 因此登出之后才返回的响应不会改写会话。

use crate::token::{TokenStore, decode_subject};
use farmlink_shared::{Capability, Role, UserDetails, UserId};

/// 会话中的用户信息
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUser {
    /// 只从 token 解出了 id，角色未知
    Partial { id: UserId },
    /// 已经拉取到完整信息
    Full(UserDetails),
}

impl SessionUser {
    pub fn id(&self) -> UserId {
        match self {
            SessionUser::Partial { id } => *id,
            SessionUser::Full(details) => details.id,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            SessionUser::Partial { .. } => None,
            SessionUser::Full(details) => Some(details.role),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            SessionUser::Partial { .. } => None,
            SessionUser::Full(details) => Some(&details.username),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<SessionUser>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub generation: u64,
}

impl SessionState {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(SessionUser::role)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(SessionUser::id)
    }

    /// 已登录但角色未知，需要补拉用户详情
    pub fn needs_details(&self) -> bool {
        self.is_authenticated && matches!(self.user, Some(SessionUser::Partial { .. }))
    }

    /// 角色未知时一律返回 false
    pub fn can(&self, capability: Capability) -> bool {
        self.role().is_some_and(|r| r.can(capability))
    }

    /// 回到未登录，同时开启新的 generation
    fn reset(&mut self) {
        self.token = None;
        self.user = None;
        self.is_authenticated = false;
        self.is_loading = false;
        self.generation += 1;
    }
}

/// 启动时从持久化 token 生成初始会话
///
/// 不发起任何网络请求。token 无法解析时直接擦除，按未登录处理。
pub fn initial_session(tokens: &dyn TokenStore) -> SessionState {
    let Some(token) = tokens.load() else {
        return SessionState::default();
    };

    match decode_subject(&token) {
        Ok(id) => SessionState {
            token: Some(token),
            user: Some(SessionUser::Partial { id }),
            is_authenticated: true,
            is_loading: false,
            generation: 0,
        },
        Err(e) => {
            log::warn!("discarding unreadable stored token: {}", e);
            tokens.clear();
            SessionState::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    LoginPending,
    LoginFulfilled {
        generation: u64,
        token: String,
        user: UserDetails,
    },
    LoginRejected {
        generation: u64,
    },
    DetailsFulfilled {
        generation: u64,
        user: UserDetails,
    },
    DetailsRejected {
        generation: u64,
    },
    LoggedOut,
}

impl SessionState {
    /// 应用一个动作，返回是否生效
    ///
    /// 携带 generation 的动作只在 generation 仍然一致时生效；
    /// 调用方据此决定是否执行清除 token 之类的副作用。
    pub fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::LoginPending => {
                self.reset();
                self.is_loading = true;
                true
            }
            SessionAction::LoginFulfilled {
                generation,
                token,
                user,
            } => {
                if generation != self.generation {
                    return false;
                }
                self.token = Some(token);
                self.user = Some(SessionUser::Full(user));
                self.is_authenticated = true;
                self.is_loading = false;
                true
            }
            SessionAction::LoginRejected { generation } => {
                if generation != self.generation {
                    return false;
                }
                self.reset();
                true
            }
            SessionAction::DetailsFulfilled { generation, user } => {
                if generation != self.generation || !self.is_authenticated {
                    return false;
                }
                self.user = Some(SessionUser::Full(user));
                true
            }
            SessionAction::DetailsRejected { generation } => {
                if generation != self.generation || !self.is_authenticated {
                    return false;
                }
                self.reset();
                true
            }
            SessionAction::LoggedOut => {
                self.reset();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{MemoryTokenStore, fake_jwt};
    use serde_json::json;

    fn farmer(id: UserId) -> UserDetails {
        UserDetails {
            id,
            username: "a".into(),
            email: None,
            role: Role::Farmer,
        }
    }

    #[test]
    fn test_initial_session_without_token() {
        let state = initial_session(&MemoryTokenStore::new());
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_initial_session_decodes_partial_user() {
        let token = fake_jwt(json!({"sub": "42"}));
        let store = MemoryTokenStore::with_token(&token);

        let state = initial_session(&store);
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some(token.as_str()));
        assert_eq!(state.user, Some(SessionUser::Partial { id: 42 }));
        assert_eq!(state.role(), None);
        assert!(state.needs_details());
    }

    #[test]
    fn test_initial_session_erases_garbage_token() {
        let store = MemoryTokenStore::with_token("garbage");
        let state = initial_session(&store);
        assert!(!state.is_authenticated);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_stale_details_after_logout_are_dropped() {
        let mut state = SessionState {
            token: Some("t".into()),
            user: Some(SessionUser::Partial { id: 42 }),
            is_authenticated: true,
            ..Default::default()
        };
        let generation = state.generation;

        assert!(state.apply(SessionAction::LoggedOut));
        assert!(!state.apply(SessionAction::DetailsFulfilled {
            generation,
            user: farmer(42),
        }));
        assert!(!state.apply(SessionAction::DetailsRejected { generation }));
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_login_superseded_by_newer_login() {
        let mut state = SessionState::default();
        state.apply(SessionAction::LoginPending);
        let first = state.generation;
        state.apply(SessionAction::LoginPending);

        assert!(!state.apply(SessionAction::LoginFulfilled {
            generation: first,
            token: "old".into(),
            user: farmer(1),
        }));
        assert!(state.is_loading);
        assert!(state.token.is_none());
    }

    #[test]
    fn test_details_fulfilled_fills_role() {
        let mut state = SessionState {
            token: Some("t".into()),
            user: Some(SessionUser::Partial { id: 42 }),
            is_authenticated: true,
            ..Default::default()
        };
        let generation = state.generation;
        assert!(state.apply(SessionAction::DetailsFulfilled {
            generation,
            user: farmer(42),
        }));
        assert_eq!(state.role(), Some(Role::Farmer));
        assert!(state.can(Capability::ManageListings));
        assert!(!state.can(Capability::ApproveUsers));
    }
}
