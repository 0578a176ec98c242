use farmlink_shared::AdminUser;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminState {
    pub users: Vec<AdminUser>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    FetchPending,
    FetchFulfilled(Vec<AdminUser>),
    FetchRejected(String),
    /// 服务端返回的最新用户记录
    UserUpdated(AdminUser),
}

impl AdminState {
    pub fn apply(&mut self, action: AdminAction) {
        match action {
            AdminAction::FetchPending => {
                self.is_loading = true;
                self.error = None;
            }
            AdminAction::FetchFulfilled(users) => {
                self.is_loading = false;
                self.users = users;
            }
            AdminAction::FetchRejected(error) => {
                self.is_loading = false;
                self.error = Some(error);
            }
            AdminAction::UserUpdated(user) => {
                if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
                    *slot = user;
                }
            }
        }
    }

    /// 尚未审核的用户
    pub fn pending(&self) -> impl Iterator<Item = &AdminUser> {
        self.users.iter().filter(|u| !u.is_approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmlink_shared::{Role, UserId};

    fn user(id: UserId, is_approved: bool) -> AdminUser {
        AdminUser {
            id,
            username: format!("user{}", id),
            email: format!("user{}@farm.test", id),
            phone_number: None,
            role: Role::Farmer,
            is_approved,
        }
    }

    #[test]
    fn test_user_replaced_in_place() {
        let mut state = AdminState::default();
        state.apply(AdminAction::FetchFulfilled(vec![user(5, false), user(7, false)]));
        state.apply(AdminAction::UserUpdated(user(7, true)));

        assert_eq!(state.users, vec![user(5, false), user(7, true)]);
        assert_eq!(state.pending().map(|u| u.id).collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_update_for_unknown_user_is_ignored() {
        let mut state = AdminState::default();
        state.apply(AdminAction::FetchFulfilled(vec![user(5, false)]));
        state.apply(AdminAction::UserUpdated(user(8, true)));
        assert_eq!(state.users, vec![user(5, false)]);
    }
}
