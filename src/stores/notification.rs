use chrono::{DateTime, Utc};

use crate::filter::Where;
use crate::models::{Notification, NotificationType};

entity_store!(NotificationStore, Notification);

impl NotificationStore {
    /// Replace the stored notification with the same id, including the current item
    pub fn update_notification(&mut self, notification: Notification) -> bool {
        self.update_item(&notification.id.clone(), |stored| *stored = notification.clone())
    }

    pub fn by_type(&self, notification_type: NotificationType) -> Vec<&Notification> {
        self.items()
            .iter()
            .filter(|n| n.notification_type == notification_type)
            .collect()
    }

    pub fn unread(&self) -> Vec<&Notification> {
        self.find(Where::new().eq("is_read", false).is_null("deleted_at"))
    }

    pub fn by_user(&self, user_id: &str) -> Vec<&Notification> {
        self.find(Where::new().eq("user_id", user_id))
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.unread().iter().filter(|n| n.user_id == user_id).count()
    }

    pub fn mark_as_read(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        self.update_item(id, |n| {
            n.is_read = true;
            n.read_at = Some(at);
        })
    }

    /// Mark every unread notification of `user_id` as read; returns how many changed
    pub fn mark_all_as_read(&mut self, user_id: &str, at: DateTime<Utc>) -> usize {
        let updates: Vec<_> = self
            .items()
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .map(|n| {
                (n.id.clone(), move |n: &mut Notification| {
                    n.is_read = true;
                    n.read_at = Some(at);
                })
            })
            .collect();
        self.batch_update(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LoggingOptions, StoreOptions};
    use crate::testing::notification;

    #[test]
    fn mark_all_as_read_only_touches_the_user() {
        let now = Utc::now();
        let mut store = NotificationStore::new(StoreOptions::for_entity().logging(LoggingOptions::disabled()));
        store.set_items(vec![
            notification("n1", "u1", NotificationType::Message),
            notification("n2", "u1", NotificationType::Payment),
            notification("n3", "u2", NotificationType::Message),
        ]);

        assert_eq!(store.unread_count("u1"), 2);
        assert_eq!(store.mark_all_as_read("u1", now), 2);
        assert_eq!(store.mark_all_as_read("u1", now), 0);

        let unread: Vec<_> = store.unread().iter().map(|n| n.id.clone()).collect();
        assert_eq!(unread, vec!["n3"]);
        assert_eq!(store.get_by_id("n1").unwrap().read_at, Some(now));
    }

    #[test]
    fn mark_as_read_and_type_lookup() {
        let mut store = NotificationStore::new(StoreOptions::for_entity().logging(LoggingOptions::disabled()));
        store.add_item(notification("n1", "u1", NotificationType::Review));

        assert!(store.mark_as_read("n1", Utc::now()));
        assert!(!store.mark_as_read("missing", Utc::now()));
        assert_eq!(store.by_type(NotificationType::Review).len(), 1);
        assert!(store.unread().is_empty());
    }
}
