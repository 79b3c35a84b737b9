//! Background scheduled tasks for the application.
//!
//! This module centralizes all recurring background jobs (stale payment
//! sweeping, old data cleanup, and inactive user deactivation).
//! Call `spawn_all` once during startup to launch them.

use crate::services::{PaymentService, UserService};

/// Spawn all background tasks.
///
/// Notes
/// - Each task is idempotent as implemented in its service and runs on its own schedule.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(payment_service: PaymentService, user_service: UserService) {
    // 每小时把超过 24 小时仍 pending 的付款置为 failed
    {
        let svc = payment_service.clone();
        tokio::spawn(async move {
            loop {
                match svc.sweep_stale_payments().await {
                    Ok(n) if n > 0 => log::info!("Stale payments marked as failed: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to sweep stale payments: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
        });
    }

    // 每天清理一年前的 failed 付款
    {
        let svc = payment_service.clone();
        tokio::spawn(async move {
            loop {
                match svc.cleanup_old_payments().await {
                    Ok(n) if n > 0 => log::info!("Old failed payments removed: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to clean up old payments: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(24 * 3600)).await;
            }
        });
    }

    // 每天停用超过 30 天未登录的用户（staff/superuser 除外）
    {
        let svc = user_service.clone();
        tokio::spawn(async move {
            loop {
                match svc.deactivate_inactive_users().await {
                    Ok(n) if n > 0 => log::info!("Inactive users deactivated: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to deactivate inactive users: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(24 * 3600)).await;
            }
        });
    }
}
