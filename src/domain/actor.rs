// src/domain/actor.rs

string_enum!(Role {
    User => "USER",
    Admin => "ADMIN",
});

/// The authenticated user a request acts on behalf of.
/// Resolved once per request and passed explicitly into every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn is_elevated(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners may mutate their own buyers; admins may mutate any.
    pub fn may_modify(&self, owner_id: &str) -> bool {
        self.is_elevated() || self.user_id == owner_id
    }
}
