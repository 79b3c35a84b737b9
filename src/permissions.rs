//! 访问控制：角色解析、操作裁决与可见性过滤。
//!
//! 规则先做可见性过滤再做权限判定：普通用户看不到他人的资源，
//! 对不可见资源的任何操作一律返回 NotFound 而不是 Forbidden，
//! 避免向未授权用户暴露资源是否存在。

use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait};

/// 用户角色，每个用户恰好解析为其中之一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Regular,
    Moderator,
    Admin,
}

impl Role {
    /// is_staff/is_superuser 优先于版主标记
    pub fn resolve(user: &users::Model) -> Role {
        if user.is_staff || user.is_superuser {
            Role::Admin
        } else if user.is_moderator {
            Role::Moderator
        } else {
            Role::Regular
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    ReadList,
    ReadDetail,
    Update,
    Delete,
}

/// 每个请求解析一次的操作者
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn from_user(user: &users::Model) -> Self {
        Self {
            id: user.id,
            role: Role::resolve(user),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 资料读取时的字段裁剪标记
    pub fn is_self(&self, user_id: i64) -> bool {
        self.id == user_id
    }
}

/// 按已认证的用户 ID 解析操作者，角色每个请求只解析一次
pub async fn load_actor(pool: &DatabaseConnection, user_id: i64) -> AppResult<Actor> {
    let user = users::Entity::find_by_id(user_id)
        .one(pool)
        .await?
        .ok_or_else(|| AppError::AuthError("User not found".to_string()))?;

    if !user.is_active {
        return Err(AppError::AuthError("Account is deactivated".to_string()));
    }

    Ok(Actor::from_user(&user))
}

/// 课程/课时列表的所有者过滤：None 表示全量可见
pub fn content_scope(actor: &Actor) -> Option<i64> {
    match actor.role {
        Role::Admin | Role::Moderator => None,
        Role::Regular => Some(actor.id),
    }
}

/// 付款列表的所有者过滤
pub fn payment_scope(actor: &Actor) -> Option<i64> {
    match actor.role {
        Role::Admin | Role::Moderator => None,
        Role::Regular => Some(actor.id),
    }
}

/// 课程/课时的操作裁决。
///
/// `owner_id` 为资源当前所有者；所有者可能为空（原账号已删除），
/// 这类孤儿资源仅管理员可变更。
pub fn check_content(
    actor: &Actor,
    action: Action,
    owner_id: Option<i64>,
    resource: &str,
) -> AppResult<()> {
    // 可见性优先：普通用户对不属于自己的资源一律 404
    if matches!(action, Action::ReadDetail | Action::Update | Action::Delete)
        && actor.role == Role::Regular
        && owner_id != Some(actor.id)
    {
        return Err(AppError::NotFound(format!("{resource} not found")));
    }

    match action {
        Action::Create => match actor.role {
            // 版主不能创建内容
            Role::Moderator => Err(AppError::Forbidden),
            Role::Regular | Role::Admin => Ok(()),
        },
        Action::ReadList | Action::ReadDetail => Ok(()),
        Action::Update => match actor.role {
            Role::Admin => Ok(()),
            // 孤儿资源仅管理员可改
            Role::Moderator if owner_id.is_none() => Err(AppError::Forbidden),
            Role::Moderator => Ok(()),
            Role::Regular => Ok(()),
        },
        Action::Delete => match actor.role {
            Role::Admin => Ok(()),
            // 版主不能删除内容
            Role::Moderator => Err(AppError::Forbidden),
            Role::Regular => Ok(()),
        },
    }
}

/// 付款的操作裁决：读取对所有者/版主/管理员开放，变更仅管理员。
pub fn check_payment(actor: &Actor, action: Action, owner_id: Option<i64>) -> AppResult<()> {
    // 普通用户只看得到自己的付款记录
    if matches!(action, Action::ReadDetail | Action::Update | Action::Delete)
        && actor.role == Role::Regular
        && owner_id != Some(actor.id)
    {
        return Err(AppError::NotFound("Payment not found".to_string()));
    }

    match action {
        Action::ReadList | Action::ReadDetail => Ok(()),
        Action::Create | Action::Update | Action::Delete => {
            if actor.is_admin() {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, is_staff: bool, is_superuser: bool, is_moderator: bool) -> users::Model {
        users::Model {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            phone: None,
            city: None,
            is_active: true,
            is_staff,
            is_superuser,
            is_moderator,
            last_login: None,
            date_joined: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn regular(id: i64) -> Actor {
        Actor::new(id, Role::Regular)
    }

    fn moderator(id: i64) -> Actor {
        Actor::new(id, Role::Moderator)
    }

    fn admin(id: i64) -> Actor {
        Actor::new(id, Role::Admin)
    }

    #[test]
    fn test_role_resolution() {
        assert_eq!(Role::resolve(&user(1, false, false, false)), Role::Regular);
        assert_eq!(Role::resolve(&user(1, false, false, true)), Role::Moderator);
        assert_eq!(Role::resolve(&user(1, true, false, false)), Role::Admin);
        assert_eq!(Role::resolve(&user(1, false, true, false)), Role::Admin);
        // 同时在版主组时 staff 优先
        assert_eq!(Role::resolve(&user(1, true, false, true)), Role::Admin);
    }

    #[test]
    fn test_create_denied_for_moderator_only() {
        assert!(check_content(&regular(1), Action::Create, None, "Course").is_ok());
        assert!(check_content(&admin(1), Action::Create, None, "Course").is_ok());
        assert!(matches!(
            check_content(&moderator(1), Action::Create, None, "Course"),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_regular_non_owner_gets_not_found_not_forbidden() {
        // 不可见资源的存在性不能通过 403 泄露
        for action in [Action::ReadDetail, Action::Update, Action::Delete] {
            match check_content(&regular(1), action, Some(2), "Course") {
                Err(AppError::NotFound(_)) => {}
                other => panic!("expected NotFound, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_owner_has_full_rights() {
        for action in [Action::ReadDetail, Action::Update, Action::Delete] {
            assert!(check_content(&regular(7), action, Some(7), "Lesson").is_ok());
        }
    }

    #[test]
    fn test_moderator_reads_and_updates_but_never_deletes() {
        assert!(check_content(&moderator(1), Action::ReadDetail, Some(2), "Lesson").is_ok());
        assert!(check_content(&moderator(1), Action::Update, Some(2), "Lesson").is_ok());
        assert!(matches!(
            check_content(&moderator(1), Action::Delete, Some(2), "Lesson"),
            Err(AppError::Forbidden)
        ));
        // 对自己拥有的资源同样不能删除或创建
        assert!(matches!(
            check_content(&moderator(1), Action::Delete, Some(1), "Lesson"),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_can_do_all_four() {
        for action in [
            Action::Create,
            Action::ReadDetail,
            Action::Update,
            Action::Delete,
        ] {
            assert!(check_content(&admin(1), action, Some(2), "Lesson").is_ok());
        }
    }

    #[test]
    fn test_orphaned_content_mutable_by_admin_only() {
        assert!(check_content(&admin(1), Action::Update, None, "Course").is_ok());
        assert!(check_content(&admin(1), Action::Delete, None, "Course").is_ok());
        assert!(check_content(&moderator(1), Action::ReadDetail, None, "Course").is_ok());
        assert!(matches!(
            check_content(&moderator(1), Action::Update, None, "Course"),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            check_content(&regular(1), Action::ReadDetail, None, "Course"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_content_scope() {
        assert_eq!(content_scope(&regular(5)), Some(5));
        assert_eq!(content_scope(&moderator(5)), None);
        assert_eq!(content_scope(&admin(5)), None);
    }

    #[test]
    fn test_payment_scope() {
        assert_eq!(payment_scope(&regular(5)), Some(5));
        assert_eq!(payment_scope(&moderator(5)), None);
        assert_eq!(payment_scope(&admin(5)), None);
    }

    #[test]
    fn test_payment_read() {
        assert!(check_payment(&regular(1), Action::ReadDetail, Some(1)).is_ok());
        assert!(matches!(
            check_payment(&regular(1), Action::ReadDetail, Some(2)),
            Err(AppError::NotFound(_))
        ));
        assert!(check_payment(&moderator(1), Action::ReadDetail, Some(2)).is_ok());
        assert!(check_payment(&admin(1), Action::ReadDetail, Some(2)).is_ok());
    }

    #[test]
    fn test_payment_mutation_admin_only() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(check_payment(&admin(1), action, Some(2)).is_ok());
            assert!(matches!(
                check_payment(&moderator(1), action, Some(2)),
                Err(AppError::Forbidden)
            ));
        }
        // 普通用户对自己的付款记录可见，但变更仍是 403
        assert!(matches!(
            check_payment(&regular(1), Action::Update, Some(1)),
            Err(AppError::Forbidden)
        ));
        // 他人的付款记录不可见，变更是 404
        assert!(matches!(
            check_payment(&regular(1), Action::Update, Some(2)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_is_self() {
        let actor = Actor::from_user(&user(3, false, false, false));
        assert!(actor.is_self(3));
        assert!(!actor.is_self(4));
    }
}
