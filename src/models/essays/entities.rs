use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{EssayError, Result};

/// 作文状态
///
/// `draft → saved → checked → appeal → appealed`，发布状态与之正交。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub enum EssayStatus {
    Draft,    // 草稿，仅作者可编辑
    Saved,    // 已提交评分，等待结果
    Checked,  // 已评分
    Appeal,   // 申诉中
    Appealed, // 申诉已处理
}

impl EssayStatus {
    pub const DRAFT: &'static str = "draft";
    pub const SAVED: &'static str = "saved";
    pub const CHECKED: &'static str = "checked";
    pub const APPEAL: &'static str = "appeal";
    pub const APPEALED: &'static str = "appealed";

    pub fn as_str(&self) -> &'static str {
        match self {
            EssayStatus::Draft => Self::DRAFT,
            EssayStatus::Saved => Self::SAVED,
            EssayStatus::Checked => Self::CHECKED,
            EssayStatus::Appeal => Self::APPEAL,
            EssayStatus::Appealed => Self::APPEALED,
        }
    }

    /// 草稿不可发布
    pub fn can_publish(&self) -> bool {
        !matches!(self, EssayStatus::Draft)
    }

    /// 在当前状态上执行动作，返回目标状态
    pub fn apply(&self, action: EssayAction) -> Result<EssayStatus> {
        if *self != action.source() {
            return Err(EssayError::invalid_state(format!(
                "Cannot {} an essay in status '{}'",
                action.verb(),
                self
            )));
        }
        Ok(action.target())
    }
}

impl<'de> Deserialize<'de> for EssayStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<EssayStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作文状态: '{s}'. 支持的状态: draft, saved, checked, appeal, appealed"
            ))
        })
    }
}

impl std::fmt::Display for EssayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EssayStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::DRAFT => Ok(EssayStatus::Draft),
            Self::SAVED => Ok(EssayStatus::Saved),
            Self::CHECKED => Ok(EssayStatus::Checked),
            Self::APPEAL => Ok(EssayStatus::Appeal),
            Self::APPEALED => Ok(EssayStatus::Appealed),
            _ => Err(format!("Invalid essay status: {s}")),
        }
    }
}

/// 推进状态的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EssayAction {
    Save,
    ReceiveResult,
    Appeal,
    ReceiveAppealResult,
}

impl EssayAction {
    /// 动作要求的起始状态
    pub fn source(&self) -> EssayStatus {
        match self {
            EssayAction::Save => EssayStatus::Draft,
            EssayAction::ReceiveResult => EssayStatus::Saved,
            EssayAction::Appeal => EssayStatus::Checked,
            EssayAction::ReceiveAppealResult => EssayStatus::Appeal,
        }
    }

    pub fn target(&self) -> EssayStatus {
        match self {
            EssayAction::Save => EssayStatus::Saved,
            EssayAction::ReceiveResult => EssayStatus::Checked,
            EssayAction::Appeal => EssayStatus::Appeal,
            EssayAction::ReceiveAppealResult => EssayStatus::Appealed,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            EssayAction::Save => "save",
            EssayAction::ReceiveResult => "grade",
            EssayAction::Appeal => "appeal",
            EssayAction::ReceiveAppealResult => "re-grade",
        }
    }
}

// 作文实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct Essay {
    pub id: i64,
    pub essay_text: String,
    pub author_id: i64,
    pub variant_id: i64,
    pub status: EssayStatus,
    pub is_published: bool,
    pub appeal_text: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Essay {
    /// 所有修改操作都要求调用者是作者
    pub fn ensure_author(&self, user_id: i64) -> Result<()> {
        if self.author_id != user_id {
            return Err(EssayError::wrong_owner(format!(
                "User {user_id} is not the author of essay {}",
                self.id
            )));
        }
        Ok(())
    }

    /// 只有草稿可以修改正文
    pub fn ensure_editable(&self) -> Result<()> {
        if self.status != EssayStatus::Draft {
            return Err(EssayError::invalid_state(format!(
                "Essay {} is '{}', only drafts can be edited",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// 发布/取消发布的目标值；None 表示已处于目标状态
    pub fn publication_change(&self, publish: bool) -> Result<Option<bool>> {
        if publish && !self.status.can_publish() {
            return Err(EssayError::invalid_state("Cannot publish a draft"));
        }
        if self.is_published == publish {
            return Ok(None);
        }
        Ok(Some(publish))
    }

    /// 作者本人、版主（非草稿）或公开作文可读
    pub fn is_visible_to(&self, viewer: Option<(i64, bool)>) -> bool {
        match viewer {
            Some((user_id, _)) if user_id == self.author_id => true,
            Some((_, true)) => self.status != EssayStatus::Draft,
            _ => self.is_published,
        }
    }

    /// 点赞与评论：公开作文人人可读，否则仅作者和版主
    pub fn engagement_visible_to(&self, viewer: Option<(i64, bool)>) -> bool {
        match viewer {
            _ if self.is_published => true,
            Some((user_id, is_moderator)) => is_moderator || user_id == self.author_id,
            None => false,
        }
    }

    /// 只有公开作文可以点赞和评论
    pub fn ensure_published(&self) -> Result<()> {
        if !self.is_published {
            return Err(EssayError::invalid_state(format!(
                "Essay {} is not published",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn essay(status: EssayStatus, is_published: bool) -> Essay {
        Essay {
            id: 7,
            essay_text: "text".into(),
            author_id: 1,
            variant_id: 1,
            status,
            is_published,
            appeal_text: None,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let saved = EssayStatus::Draft.apply(EssayAction::Save).unwrap();
        assert_eq!(saved, EssayStatus::Saved);
        let checked = saved.apply(EssayAction::ReceiveResult).unwrap();
        assert_eq!(checked, EssayStatus::Checked);
        let appeal = checked.apply(EssayAction::Appeal).unwrap();
        assert_eq!(appeal, EssayStatus::Appeal);
        let appealed = appeal.apply(EssayAction::ReceiveAppealResult).unwrap();
        assert_eq!(appealed, EssayStatus::Appealed);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let err = EssayStatus::Saved.apply(EssayAction::Save).unwrap_err();
        assert_eq!(err.code(), "E004");
        assert!(EssayStatus::Draft.apply(EssayAction::Appeal).is_err());
        assert!(EssayStatus::Appealed.apply(EssayAction::Appeal).is_err());
        assert!(
            EssayStatus::Checked
                .apply(EssayAction::ReceiveResult)
                .is_err()
        );
        assert!(
            EssayStatus::Saved
                .apply(EssayAction::ReceiveAppealResult)
                .is_err()
        );
    }

    #[test]
    fn test_draft_never_publishable() {
        let draft = essay(EssayStatus::Draft, false);
        assert!(draft.publication_change(true).is_err());
        // 取消发布草稿是 no-op
        assert_eq!(draft.publication_change(false).unwrap(), None);

        for status in [
            EssayStatus::Saved,
            EssayStatus::Checked,
            EssayStatus::Appeal,
            EssayStatus::Appealed,
        ] {
            assert_eq!(essay(status, false).publication_change(true).unwrap(), Some(true));
        }
    }

    #[test]
    fn test_publish_is_idempotent() {
        let published = essay(EssayStatus::Checked, true);
        assert_eq!(published.publication_change(true).unwrap(), None);
        assert_eq!(published.publication_change(false).unwrap(), Some(false));
    }

    #[test]
    fn test_ownership() {
        let e = essay(EssayStatus::Draft, false);
        assert!(e.ensure_author(1).is_ok());
        assert_eq!(e.ensure_author(2).unwrap_err().code(), "E003");
    }

    #[test]
    fn test_only_drafts_editable() {
        assert!(essay(EssayStatus::Draft, false).ensure_editable().is_ok());
        assert!(essay(EssayStatus::Saved, false).ensure_editable().is_err());
    }

    #[test]
    fn test_visibility() {
        let draft = essay(EssayStatus::Draft, false);
        assert!(draft.is_visible_to(Some((1, false))));
        assert!(!draft.is_visible_to(Some((2, true))));
        assert!(!draft.is_visible_to(None));

        let hidden = essay(EssayStatus::Appeal, false);
        assert!(hidden.is_visible_to(Some((2, true))));
        assert!(!hidden.is_visible_to(Some((2, false))));

        let public = essay(EssayStatus::Checked, true);
        assert!(public.is_visible_to(None));
    }

    #[test]
    fn test_engagement_visibility() {
        let hidden = essay(EssayStatus::Checked, false);
        assert!(hidden.engagement_visible_to(Some((1, false))));
        assert!(hidden.engagement_visible_to(Some((9, true))));
        assert!(!hidden.engagement_visible_to(Some((9, false))));
        assert!(!hidden.engagement_visible_to(None));
        assert!(hidden.ensure_published().is_err());

        let public = essay(EssayStatus::Checked, true);
        assert!(public.engagement_visible_to(None));
        assert!(public.ensure_published().is_ok());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("appeal".parse::<EssayStatus>(), Ok(EssayStatus::Appeal));
        assert!("archived".parse::<EssayStatus>().is_err());
        let parsed: EssayStatus = serde_json::from_str("\"checked\"").unwrap();
        assert_eq!(parsed, EssayStatus::Checked);
    }
}
