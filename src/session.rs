//! Session lifecycle carried over from the interactive controller: one phase,
//! at most one in-flight request, exactly one active report or none. The
//! active selection is an id into the repository, never a detached copy.

use serde::Serialize;

use crate::error::AppError;
use crate::store::ReportRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No active report; the drafting form is editable.
    Idle,
    /// Initial draft in flight; triggers are locked.
    Generating,
    /// An active report is displayed; refinement is available.
    Viewing,
    /// Refinement in flight while viewing; triggers are locked.
    Refining,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    active: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            phase: Phase::Idle,
            active: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Generating | Phase::Refining)
    }

    pub fn ensure_not_busy(&self) -> Result<(), AppError> {
        if self.is_busy() {
            Err(AppError::Conflict(
                "a generation request is already in flight".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// `Idle -> Generating`. Drafting with a report open is rejected; the
    /// client closes it first, exactly as the original form only existed
    /// while no report was active.
    pub fn begin_generation(&mut self) -> Result<(), AppError> {
        self.ensure_not_busy()?;
        if self.phase == Phase::Viewing {
            return Err(AppError::Conflict(
                "close the active report before drafting a new one".to_string(),
            ));
        }
        self.phase = Phase::Generating;
        Ok(())
    }

    /// Success makes the new report active (`Viewing`); failure returns to
    /// `Idle` with nothing added.
    pub fn finish_generation(&mut self, new_active: Option<String>) {
        match new_active {
            Some(id) => {
                self.active = Some(id);
                self.phase = Phase::Viewing;
            }
            None => {
                self.active = None;
                self.phase = Phase::Idle;
            }
        }
    }

    /// `Viewing -> Refining`, only for the active report.
    pub fn begin_refinement(&mut self, id: &str) -> Result<(), AppError> {
        self.ensure_not_busy()?;
        if self.phase != Phase::Viewing {
            return Err(AppError::Conflict(
                "no report is open for refinement".to_string(),
            ));
        }
        if self.active.as_deref() != Some(id) {
            return Err(AppError::Conflict(
                "only the active report can be refined".to_string(),
            ));
        }
        self.phase = Phase::Refining;
        Ok(())
    }

    /// Back to `Viewing` whether the refinement succeeded or not; on failure
    /// the prior content was never touched.
    pub fn finish_refinement(&mut self) {
        self.phase = Phase::Viewing;
    }

    pub fn open(&mut self, id: &str) -> Result<(), AppError> {
        self.ensure_not_busy()?;
        self.active = Some(id.to_string());
        self.phase = Phase::Viewing;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), AppError> {
        self.ensure_not_busy()?;
        self.active = None;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Clears the active selection when its report is removed.
    pub fn note_removed(&mut self, id: &str) {
        if self.active.as_deref() == Some(id) {
            self.active = None;
            self.phase = Phase::Idle;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the handlers mutate, behind one lock: the repository owning the
/// reports and the session pointing into it. The lock is never held across an
/// await; in-flight requests are modeled by the phase instead.
pub struct Workspace {
    pub repo: ReportRepository,
    pub session: Session,
}

impl Workspace {
    pub fn new(repo: ReportRepository) -> Self {
        Workspace {
            repo,
            session: Session::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle_with_no_active_report() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.active_id().is_none());
    }

    #[test]
    fn test_generation_success_path() {
        let mut session = Session::new();
        session.begin_generation().unwrap();
        assert_eq!(session.phase(), Phase::Generating);

        session.finish_generation(Some("42".to_string()));
        assert_eq!(session.phase(), Phase::Viewing);
        assert_eq!(session.active_id(), Some("42"));
    }

    #[test]
    fn test_generation_failure_restores_idle() {
        let mut session = Session::new();
        session.begin_generation().unwrap();
        session.finish_generation(None);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.active_id().is_none());
    }

    #[test]
    fn test_second_generation_rejected_while_in_flight() {
        let mut session = Session::new();
        session.begin_generation().unwrap();
        assert!(matches!(
            session.begin_generation(),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_generation_rejected_while_viewing() {
        let mut session = Session::new();
        session.open("1").unwrap();
        assert!(matches!(
            session.begin_generation(),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_refinement_requires_active_report() {
        let mut session = Session::new();
        assert!(session.begin_refinement("1").is_err());

        session.open("1").unwrap();
        assert!(session.begin_refinement("2").is_err());
        session.begin_refinement("1").unwrap();
        assert_eq!(session.phase(), Phase::Refining);

        session.finish_refinement();
        assert_eq!(session.phase(), Phase::Viewing);
        assert_eq!(session.active_id(), Some("1"));
    }

    #[test]
    fn test_open_and_close_blocked_while_busy() {
        let mut session = Session::new();
        session.begin_generation().unwrap();
        assert!(session.open("1").is_err());
        assert!(session.close().is_err());
    }

    #[test]
    fn test_open_switches_active_report() {
        let mut session = Session::new();
        session.open("1").unwrap();
        session.open("2").unwrap();
        assert_eq!(session.active_id(), Some("2"));
        session.close().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_note_removed_clears_matching_active() {
        let mut session = Session::new();
        session.open("1").unwrap();

        session.note_removed("2");
        assert_eq!(session.active_id(), Some("1"));

        session.note_removed("1");
        assert!(session.active_id().is_none());
        assert_eq!(session.phase(), Phase::Idle);
    }
}
