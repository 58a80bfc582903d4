//! Orchestration of the logbook lifecycle against the store: read the
//! affected entries, run the pure gate, rewrite tags row by row, record
//! the action, notify the counterpart.

use std::sync::Arc;

use sqlx::PgPool;
use time::Date;

use crate::domain::models::{LogEntry, UserId};
use crate::domain::{
    aggregate_state, authorize, entry_week, resolve_assignment, tagged_weeks, week_like_pattern,
    Assignment, GateContext, LogbookError, Notifier, PushNotification, Role, Transition, User,
    WeekTag, WeeklyBundle,
};
use crate::repositories::{
    AuditRecord, AuditRepository, AuditRepositoryImpl, LogEntryRepository, LogEntryRepositoryImpl,
    NewAuditRecord, NewLogEntry, ParticipationRepository, ParticipationRepositoryImpl,
};

pub struct LogbookService {
    entries: LogEntryRepositoryImpl,
    participations: ParticipationRepositoryImpl,
    audit: AuditRepositoryImpl,
    notifier: Arc<Notifier>,
}

impl LogbookService {
    pub fn new(db_pool: PgPool, notifier: Arc<Notifier>) -> Self {
        Self {
            entries: LogEntryRepositoryImpl::new(db_pool.clone()),
            participations: ParticipationRepositoryImpl::new(db_pool.clone()),
            audit: AuditRepositoryImpl::new(db_pool),
            notifier,
        }
    }

    pub async fn create_entry(&self, entry: &NewLogEntry) -> Result<LogEntry, LogbookError> {
        Ok(self.entries.create(entry).await?)
    }

    pub async fn entries_in_range(
        &self,
        owner: UserId,
        from: Date,
        to: Date,
    ) -> Result<Vec<LogEntry>, LogbookError> {
        Ok(self
            .entries
            .entries_in_range(owner.as_i32(), from, to)
            .await?)
    }

    /// Distinct week numbers with at least one tagged entry, ascending.
    pub async fn tagged_week_list(&self, owner: UserId) -> Result<Vec<u32>, LogbookError> {
        let entries = self.entries.tagged_entries(owner.as_i32()).await?;
        Ok(tagged_weeks(&entries))
    }

    pub async fn week_bundle(
        &self,
        owner: UserId,
        week: u32,
    ) -> Result<WeeklyBundle, LogbookError> {
        ensure_valid_week(week)?;

        let entries = self.week_members(owner, week).await?;
        if entries.is_empty() {
            return Err(LogbookError::NotFound(week));
        }

        Ok(WeeklyBundle::assemble(week, entries))
    }

    /// The caller's resolved project/mentor placement.
    pub async fn assignment(&self, user: UserId) -> Result<Option<Assignment>, LogbookError> {
        let rows = self.participations.assignment_rows(user.as_i32()).await?;
        Ok(resolve_assignment(user, &rows))
    }

    pub async fn project_name(&self, project_id: i32) -> Result<Option<String>, LogbookError> {
        let project = self.participations.project(project_id).await?;
        Ok(project.map(|p| p.name))
    }

    /// Whether `actor` may read `owner`'s logbook: the owner themself,
    /// their assigned mentor, or superuser and up.
    pub async fn can_view(&self, actor: &User, owner: UserId) -> Result<bool, LogbookError> {
        if actor.id == owner || actor.role.grants(Role::Superuser) {
            return Ok(true);
        }

        let assignment = self.assignment(owner).await?;
        Ok(assignment.and_then(|a| a.mentor_id) == Some(actor.id))
    }

    /// Draft/Rejected → Submitted. Bundles the owner's daily drafts in
    /// the given date range together with anything already tagged for
    /// this week, rewrites every member tag, and notifies the mentor.
    pub async fn submit_week(
        &self,
        actor: &User,
        week: u32,
        range: (Date, Date),
    ) -> Result<WeeklyBundle, LogbookError> {
        let tag = WeekTag::new(week, Transition::Submit.target_state())?;

        let assignment = self
            .assignment(actor.id)
            .await?
            .ok_or(LogbookError::Forbidden)?;

        let (from, to) = range;
        let candidates = self
            .entries
            .submission_candidates(actor.id.as_i32(), &week_like_pattern(week), from, to)
            .await?;
        let members: Vec<LogEntry> = candidates
            .into_iter()
            .filter(|entry| match entry_week(entry) {
                Some(tagged_week) => tagged_week == week,
                // an unrecognized category is still a daily draft
                None => entry.entry_date >= from && entry.entry_date <= to,
            })
            .collect();

        let ctx = GateContext {
            actor: actor.id,
            owner: actor.id,
            mentor: assignment.mentor_id,
        };
        authorize(
            Transition::Submit,
            &ctx,
            aggregate_state(&members),
            week,
            members.len(),
        )?;

        self.retag_all(&members, &tag.encode()).await?;
        self.record_action(actor, actor.id, Transition::Submit.to_string(), week, None)
            .await;

        if let Some(mentor_id) = assignment.mentor_id {
            self.notifier
                .notify_user(
                    mentor_id,
                    PushNotification::new(
                        "Logbook submitted",
                        &format!("{} submitted week {}", actor.full_name, week),
                        None,
                    ),
                )
                .await;
        }

        let entries = self.week_members(actor.id, week).await?;
        Ok(WeeklyBundle::assemble(week, entries))
    }

    /// Submitted → Approved, by the assigned mentor.
    pub async fn approve_week(
        &self,
        actor: &User,
        owner: UserId,
        week: u32,
    ) -> Result<WeeklyBundle, LogbookError> {
        self.decide_week(actor, owner, week, Transition::Approve, None)
            .await
    }

    /// Submitted → Rejected, by the assigned mentor, with an optional
    /// reason carried in the tag's detail suffix.
    pub async fn reject_week(
        &self,
        actor: &User,
        owner: UserId,
        week: u32,
        reason: Option<String>,
    ) -> Result<WeeklyBundle, LogbookError> {
        self.decide_week(actor, owner, week, Transition::Reject, reason)
            .await
    }

    async fn decide_week(
        &self,
        actor: &User,
        owner: UserId,
        week: u32,
        transition: Transition,
        reason: Option<String>,
    ) -> Result<WeeklyBundle, LogbookError> {
        let mut tag = WeekTag::new(week, transition.target_state())?;
        if let Some(reason) = &reason {
            tag = tag.with_detail(reason.clone());
        }

        let assignment = self.assignment(owner).await?;
        let ctx = GateContext {
            actor: actor.id,
            owner,
            mentor: assignment.and_then(|a| a.mentor_id),
        };

        let members = self.week_members(owner, week).await?;
        authorize(
            transition,
            &ctx,
            aggregate_state(&members),
            week,
            members.len(),
        )?;

        self.retag_all(&members, &tag.encode()).await?;
        self.record_action(actor, owner, transition.to_string(), week, reason.clone())
            .await;

        let body = if transition == Transition::Approve {
            format!("Week {} was approved", week)
        } else {
            match &reason {
                Some(reason) => format!("Week {} was rejected: {}", week, reason),
                None => format!("Week {} was rejected", week),
            }
        };
        self.notifier
            .notify_user(owner, PushNotification::new("Logbook reviewed", &body, None))
            .await;

        let entries = self.week_members(owner, week).await?;
        Ok(WeeklyBundle::assemble(week, entries))
    }

    /// Remove every entry of the caller's week. Entries of other weeks
    /// are untouched; the audit trail keeps prior decisions on record.
    pub async fn delete_week(&self, actor: &User, week: u32) -> Result<u64, LogbookError> {
        ensure_valid_week(week)?;

        let members = self.week_members(actor.id, week).await?;
        if members.is_empty() {
            return Err(LogbookError::NotFound(week));
        }

        let ids: Vec<i32> = members.iter().map(|entry| entry.id).collect();
        let deleted = self.entries.delete_by_ids(&ids).await?;
        self.record_action(actor, actor.id, "delete".to_string(), week, None)
            .await;

        Ok(deleted)
    }

    /// This week's member entries: LIKE-selected on the tag prefix, then
    /// decode-checked so a tag-shaped-but-bogus category never slips in.
    async fn week_members(&self, owner: UserId, week: u32) -> Result<Vec<LogEntry>, LogbookError> {
        let entries = self
            .entries
            .week_entries(owner.as_i32(), &week_like_pattern(week))
            .await?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry_week(entry) == Some(week))
            .collect())
    }

    /// Whole-bundle rewrite, one row at a time. A mid-loop store failure
    /// leaves a mixed bundle; re-running the same transition re-applies
    /// the same tag to every member and converges.
    async fn retag_all(&self, members: &[LogEntry], category: &str) -> Result<(), LogbookError> {
        for entry in members {
            self.entries.retag(entry.id, category).await?;
        }
        Ok(())
    }

    /// The audit trail is supplemental: a failed insert is logged but
    /// never fails a transition that already rewrote the tags.
    async fn record_action(
        &self,
        actor: &User,
        subject: UserId,
        action: String,
        week: u32,
        detail: Option<String>,
    ) {
        let record = NewAuditRecord {
            actor_id: actor.id.as_i32(),
            action,
            subject_user_id: subject.as_i32(),
            week: i64::from(week),
            detail,
        };
        if let Err(e) = self.audit.record(&record).await {
            tracing::warn!("Failed to write audit record: {:?}", e);
        }
    }

    pub async fn recent_audit(&self, limit: i64) -> Result<Vec<AuditRecord>, LogbookError> {
        Ok(self.audit.recent(limit).await?)
    }
}

fn ensure_valid_week(week: u32) -> Result<(), LogbookError> {
    if week == 0 {
        return Err(LogbookError::InvalidWeek(0));
    }
    Ok(())
}
