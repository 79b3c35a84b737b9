use crate::entities::{
    course_entity as courses, subscription_entity as subscriptions, user_entity as users,
};
use crate::error::AppResult;
use crate::external::Mailer;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// 课程更新通知的扇出服务。
///
/// 通知任务相对请求处理独立运行，投递语义为至少一次；
/// 单个收件人的失败只记录日志，不影响其余收件人。
#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
    mailer: Option<Mailer>,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection, mailer: Option<Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// 派发课程更新通知，不等待结果
    pub fn notify_course_update(&self, course_id: i64, lesson_title: String) {
        let service = self.clone();
        tokio::spawn(async move {
            match service.send_course_update(course_id, &lesson_title).await {
                Ok(outcome) => log::info!("Course update notification: {outcome}"),
                Err(e) => log::error!("Failed to send course update notifications: {e:?}"),
            }
        });
    }

    /// 给课程的全部订阅者发送新课时通知，返回文本化的执行结果
    pub async fn send_course_update(
        &self,
        course_id: i64,
        lesson_title: &str,
    ) -> AppResult<String> {
        // 课程可能在任务执行前被删除，此时无事可做
        let course = match courses::Entity::find_by_id(course_id).one(&self.pool).await? {
            Some(course) => course,
            None => {
                return Ok(format!("course {course_id} no longer exists, nothing to do"));
            }
        };

        let subs = subscriptions::Entity::find()
            .filter(subscriptions::Column::CourseId.eq(course.id))
            .all(&self.pool)
            .await?;

        if subs.is_empty() {
            return Ok(format!("course \"{}\" has no subscribers", course.title));
        }

        let subscriber_ids: Vec<i64> = subs.iter().map(|s| s.user_id).collect();
        let recipients = users::Entity::find()
            .filter(users::Column::Id.is_in(subscriber_ids))
            .all(&self.pool)
            .await?;

        let subject = format!("New lesson in course \"{}\"", course.title);
        let body = format!(
            "A new lesson has been added to course \"{}\": \"{}\"",
            course.title, lesson_title
        );

        let mut sent = 0usize;
        let mut failed = 0usize;
        for recipient in &recipients {
            match &self.mailer {
                Some(mailer) => match mailer.send(&recipient.email, &subject, &body).await {
                    Ok(()) => sent += 1,
                    Err(e) => {
                        // 单个收件人失败不中断其余通知
                        failed += 1;
                        log::error!(
                            "Failed to notify subscriber {}: {e:?}",
                            recipient.email
                        );
                    }
                },
                None => {
                    log::warn!(
                        "SMTP is not configured, skipping notification for {}",
                        recipient.email
                    );
                }
            }
        }

        Ok(format!(
            "notifications sent to {sent} of {} subscribers ({failed} failed)",
            recipients.len()
        ))
    }
}
