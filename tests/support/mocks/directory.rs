// tests/support/mocks/directory.rs
use async_trait::async_trait;
use login_history::application::{ApplicationResult, ports::directory::UserDirectory};
use login_history::domain::login::BlogId;
use login_history::domain::user::{UserId, UserSnapshot};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    users: HashMap<UserId, UserSnapshot>,
    members: HashSet<(UserId, BlogId)>,
}

impl InMemoryDirectory {
    /// admin (1, super admin), siteadmin (2), jane (5, member of blog 2) and
    /// bob (7, member of blog 1 only).
    pub fn sample() -> Self {
        Self::default()
            .with_user(1, "admin", &["administrator"], true)
            .with_user(2, "siteadmin", &["administrator"], false)
            .with_user(5, "jane", &["editor", "author"], false)
            .with_user(7, "bob", &["subscriber"], false)
            .with_member(1, 1)
            .with_member(2, 2)
            .with_member(5, 2)
            .with_member(7, 1)
    }

    pub fn with_user(mut self, id: i64, username: &str, roles: &[&str], is_super_admin: bool) -> Self {
        let id = UserId(id);
        self.users.insert(
            id,
            UserSnapshot {
                id,
                username: username.into(),
                roles: roles.iter().map(|r| (*r).to_string()).collect(),
                is_super_admin,
            },
        );
        self
    }

    pub fn with_member(mut self, user_id: i64, blog_id: i64) -> Self {
        self.members.insert((UserId(user_id), BlogId(blog_id)));
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> ApplicationResult<Option<UserSnapshot>> {
        Ok(self.users.get(&id).cloned())
    }

    async fn current_roles(&self, ids: &[UserId]) -> ApplicationResult<HashMap<UserId, Vec<String>>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| (*id, u.roles.clone())))
            .collect())
    }

    async fn super_admin_usernames(&self) -> ApplicationResult<Vec<String>> {
        let mut names: Vec<String> = self
            .users
            .values()
            .filter(|u| u.is_super_admin)
            .map(|u| u.username.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn user_ids_with_role(&self, role: &str) -> ApplicationResult<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .users
            .values()
            .filter(|u| u.roles.iter().any(|r| r.contains(role)))
            .map(|u| u.id.0)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn is_member_of_blog(&self, id: UserId, blog_id: BlogId) -> ApplicationResult<bool> {
        Ok(self.members.contains(&(id, blog_id)))
    }
}
