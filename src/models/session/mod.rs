// Session module
// Timetable session model as supplied by the host application

use std::fmt;

use serde::{Deserialize, Serialize};

use super::conflict::Conflict;
use super::day::DayKey;
use super::time_of_day::TimeOfDay;
use crate::error::GridError;

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Course format, used by hosts to pick a card colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseType {
    Cm,
    Td,
    Tp,
    Exam,
}

/// Display-only references. The grid never interprets these.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRefs {
    pub course: Option<String>,
    pub course_code: Option<String>,
    pub course_type: Option<CourseType>,
    pub room: Option<String>,
    pub teacher: Option<String>,
}

/// A scheduled session placed on one day of the teaching week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub day: DayKey,
    #[serde(alias = "startTime")]
    pub start: TimeOfDay,
    #[serde(alias = "endTime")]
    pub end: TimeOfDay,
    #[serde(default)]
    pub refs: SessionRefs,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

impl Session {
    /// Create a session with required fields
    ///
    /// # Examples
    /// ```
    /// use timetable_grid::models::day::DayKey;
    /// use timetable_grid::models::session::Session;
    /// use timetable_grid::models::time_of_day::TimeOfDay;
    ///
    /// let start = TimeOfDay::new(9, 0).unwrap();
    /// let end = TimeOfDay::new(10, 30).unwrap();
    /// let session = Session::new("anat-101", DayKey::Monday, start, end).unwrap();
    /// assert_eq!(session.duration_minutes(), 90);
    /// ```
    pub fn new(
        id: impl Into<SessionId>,
        day: DayKey,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, GridError> {
        let session = Self {
            id: id.into(),
            day,
            start,
            end,
            refs: SessionRefs::default(),
            status: SessionStatus::default(),
            is_locked: false,
            priority: Priority::default(),
            conflicts: Vec::new(),
        };
        session.validate()?;
        Ok(session)
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Validate the session bounds
    pub fn validate(&self) -> Result<(), GridError> {
        if self.id.as_str().trim().is_empty() {
            return Err(GridError::malformed(&self.id, "session id cannot be empty"));
        }

        if self.end <= self.start {
            return Err(GridError::malformed(
                &self.id,
                format!("end {} must be after start {}", self.end, self.start),
            ));
        }

        Ok(())
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Copy of this session moved to `day`/`start` with its duration preserved.
    pub fn moved_to(&self, day: DayKey, start: TimeOfDay) -> Result<Self, GridError> {
        let duration = self.duration_minutes();
        let end = start.checked_add_minutes(duration).ok_or_else(|| {
            GridError::malformed(
                &self.id,
                format!("moving to {} would end past midnight", start),
            )
        })?;

        Ok(Self {
            day,
            start,
            end,
            ..self.clone()
        })
    }
}

/// Builder for sessions with optional fields
pub struct SessionBuilder {
    id: Option<SessionId>,
    day: Option<DayKey>,
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
    refs: SessionRefs,
    status: SessionStatus,
    is_locked: bool,
    priority: Priority,
    conflicts: Vec<Conflict>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            day: None,
            start: None,
            end: None,
            refs: SessionRefs::default(),
            status: SessionStatus::default(),
            is_locked: false,
            priority: Priority::default(),
            conflicts: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<SessionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn day(mut self, day: DayKey) -> Self {
        self.day = Some(day);
        self
    }

    pub fn start(mut self, start: TimeOfDay) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: TimeOfDay) -> Self {
        self.end = Some(end);
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.refs.course = Some(course.into());
        self
    }

    pub fn course_type(mut self, course_type: CourseType) -> Self {
        self.refs.course_type = Some(course_type);
        self
    }

    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.refs.room = Some(room.into());
        self
    }

    pub fn teacher(mut self, teacher: impl Into<String>) -> Self {
        self.refs.teacher = Some(teacher.into());
        self
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn locked(mut self, is_locked: bool) -> Self {
        self.is_locked = is_locked;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn conflict(mut self, conflict: Conflict) -> Self {
        self.conflicts.push(conflict);
        self
    }

    /// Build the session
    pub fn build(self) -> Result<Session, GridError> {
        let id = self
            .id
            .ok_or_else(|| GridError::malformed(&SessionId::new(""), "session id is required"))?;
        let day = self
            .day
            .ok_or_else(|| GridError::malformed(&id, "session day is required"))?;
        let start = self
            .start
            .ok_or_else(|| GridError::malformed(&id, "session start time is required"))?;
        let end = self
            .end
            .ok_or_else(|| GridError::malformed(&id, "session end time is required"))?;

        let session = Session {
            id,
            day,
            start,
            end,
            refs: self.refs,
            status: self.status,
            is_locked: self.is_locked,
            priority: self.priority,
            conflicts: self.conflicts,
        };

        session.validate()?;
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conflict::{ConflictKind, Severity};

    fn t(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[test]
    fn test_new_session_success() {
        let session = Session::new("s1", DayKey::Monday, t(9, 0), t(10, 30)).unwrap();
        assert_eq!(session.id.as_str(), "s1");
        assert_eq!(session.duration_minutes(), 90);
        assert!(!session.is_locked);
        assert_eq!(session.status, SessionStatus::Scheduled);
        assert!(!session.has_conflicts());
    }

    #[test]
    fn test_new_session_invalid_times() {
        let result = Session::new("s1", DayKey::Monday, t(10, 0), t(9, 0));
        assert!(matches!(
            result,
            Err(GridError::MalformedSession { .. })
        ));
    }

    #[test]
    fn test_new_session_equal_times() {
        assert!(Session::new("s1", DayKey::Monday, t(10, 0), t(10, 0)).is_err());
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(Session::new("  ", DayKey::Monday, t(9, 0), t(10, 0)).is_err());
    }

    #[test]
    fn test_builder_with_optional_fields() {
        let session = Session::builder()
            .id("anat")
            .day(DayKey::Thursday)
            .start(t(8, 0))
            .end(t(10, 0))
            .course("Anatomy")
            .course_type(CourseType::Cm)
            .room("A1")
            .teacher("Dr. Mballa")
            .locked(true)
            .priority(Priority::High)
            .conflict(Conflict::new(ConflictKind::Room, Severity::Low, "Room A1 busy"))
            .build()
            .unwrap();

        assert_eq!(session.refs.course.as_deref(), Some("Anatomy"));
        assert_eq!(session.refs.course_type, Some(CourseType::Cm));
        assert!(session.is_locked);
        assert_eq!(session.priority, Priority::High);
        assert!(session.has_conflicts());
    }

    #[test]
    fn test_builder_missing_fields() {
        assert!(Session::builder().day(DayKey::Monday).build().is_err());
        assert!(Session::builder()
            .id("s1")
            .day(DayKey::Monday)
            .start(t(9, 0))
            .build()
            .is_err());
    }

    #[test]
    fn test_moved_to_preserves_duration() {
        let session = Session::new("s1", DayKey::Monday, t(9, 0), t(10, 30)).unwrap();
        let moved = session.moved_to(DayKey::Tuesday, t(14, 0)).unwrap();
        assert_eq!(moved.day, DayKey::Tuesday);
        assert_eq!(moved.start, t(14, 0));
        assert_eq!(moved.end, t(15, 30));
        assert_eq!(moved.duration_minutes(), session.duration_minutes());
    }

    #[test]
    fn test_moved_to_past_midnight() {
        let session = Session::new("s1", DayKey::Monday, t(9, 0), t(11, 0)).unwrap();
        assert!(session.moved_to(DayKey::Monday, t(23, 0)).is_err());
    }

    #[test]
    fn test_deserialize_host_payload() {
        let json = r#"{
            "id": "s-7",
            "day": "friday",
            "startTime": "13:00",
            "endTime": "15:00",
            "refs": { "course": "Physiology", "courseType": "TP", "room": "Lab 2" },
            "status": "ongoing",
            "isLocked": true,
            "priority": "high",
            "conflicts": []
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.day, DayKey::Friday);
        assert_eq!(session.start, t(13, 0));
        assert_eq!(session.refs.course_type, Some(CourseType::Tp));
        assert_eq!(session.status, SessionStatus::Ongoing);
        assert!(session.is_locked);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{ "id": "s-8", "day": "monday", "start": "09:00", "end": "10:00" }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.priority, Priority::Medium);
        assert!(!session.is_locked);
        assert!(session.conflicts.is_empty());
    }
}
