use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Comment;

/// In-memory comment board for the video pages. Comments are never deleted;
/// likes only ever go up.
#[derive(Debug, Default)]
pub struct CommentBoard {
    comments: Vec<Comment>,
}

impl CommentBoard {
    pub fn new() -> Self {
        CommentBoard::default()
    }

    pub fn add(
        &mut self,
        video_id: &str,
        user_name: &str,
        text: &str,
    ) -> Result<Comment, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::Validation("comment text cannot be empty".into()));
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            video_id: video_id.to_string(),
            user_name: user_name.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
            likes: 0,
        };
        self.comments.insert(0, comment.clone());
        Ok(comment)
    }

    /// Increments the like counter, returning the new count.
    pub fn like(&mut self, comment_id: &str) -> Option<u32> {
        let comment = self.comments.iter_mut().find(|c| c.id == comment_id)?;
        comment.likes += 1;
        Some(comment.likes)
    }

    pub fn for_video(&self, video_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect()
    }

    /// Seeds the sample comments shown under the first video. Used by the
    /// binary only; tests start from an empty board.
    pub fn seed_samples(&mut self) {
        let samples = [
            (
                "Sarah M.",
                "This meditation changed my mornings completely. I feel so much more centered now. 🙏",
                12,
                Duration::days(1),
            ),
            (
                "Emma L.",
                "Beautiful guidance. The breathwork section was particularly powerful for me.",
                8,
                Duration::days(2),
            ),
        ];

        for (user_name, text, likes, age) in samples {
            self.comments.push(Comment {
                id: Uuid::new_v4().to_string(),
                video_id: "1".to_string(),
                user_name: user_name.to_string(),
                text: text.to_string(),
                timestamp: Utc::now() - age,
                likes,
            });
        }
    }
}
