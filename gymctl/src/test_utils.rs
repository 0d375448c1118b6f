//! Shared fixtures for unit tests: a settable clock, in-memory
//! implementations of the membership store traits, and builders for the core
//! components wired against them. Everything here is deterministic; no test
//! that uses these doubles touches PostgreSQL or the wall clock.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{Config, EmailTransportConfig};
use crate::db::errors::{DbError, Result};
use crate::db::models::{
    checkins::CheckinRecord,
    enrollments::{EnrollmentCreateDBRequest, EnrollmentRecord, EnrollmentUpdateDBRequest},
    plans::PlanRecord,
    students::StudentRecord,
};
use crate::membership::checkin::CheckinEligibilityEngine;
use crate::membership::enrollment::EnrollmentLifecycleManager;
use crate::membership::stores::{CheckinStore, EnrollmentStore, PlanCatalog, StudentDirectory};
use crate::membership::StudentLocks;
use crate::notifications::{EnrollmentEvent, EnrollmentEventKind, NotificationDispatcher};
use crate::types::{EnrollmentId, PlanId, StudentId};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(h, min, s).unwrap().and_utc()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A [`Clock`] pinned to an instant chosen by the test.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// In-memory implementation of every membership store trait.
#[derive(Default)]
pub struct MemStores {
    students: Mutex<HashMap<StudentId, StudentRecord>>,
    plans: Mutex<HashMap<PlanId, PlanRecord>>,
    enrollments: Mutex<HashMap<EnrollmentId, EnrollmentRecord>>,
    checkins: Mutex<Vec<CheckinRecord>>,
}

impl MemStores {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_student(&self, name: &str, email: &str) -> StudentRecord {
        let now = Utc::now();
        let record = StudentRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            age: 25,
            weight: dec("75.5"),
            height: dec("1.75"),
            created_at: now,
            updated_at: now,
        };
        self.students.lock().unwrap().insert(record.id, record.clone());
        record
    }

    pub fn add_plan(&self, title: &str, duration: i32, price: Decimal) -> PlanRecord {
        let now = Utc::now();
        let record = PlanRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            duration,
            price,
            created_at: now,
            updated_at: now,
        };
        self.plans.lock().unwrap().insert(record.id, record.clone());
        record
    }

    /// Seed an active enrollment directly, bypassing the lifecycle manager.
    pub fn add_enrollment(&self, student_id: StudentId, start_date: NaiveDate, end_date: NaiveDate) -> EnrollmentRecord {
        let now = Utc::now();
        let record = EnrollmentRecord {
            id: Uuid::new_v4(),
            student_id,
            plan_id: Uuid::new_v4(),
            start_date,
            end_date,
            price: dec("100.00"),
            canceled_at: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        self.enrollments.lock().unwrap().insert(record.id, record.clone());
        record
    }

    pub fn enrollment_by_id(&self, id: EnrollmentId) -> Option<EnrollmentRecord> {
        self.enrollments.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PlanCatalog for MemStores {
    async fn plan_by_id(&self, id: PlanId) -> Result<Option<PlanRecord>> {
        Ok(self.plans.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl StudentDirectory for MemStores {
    async fn student_by_id(&self, id: StudentId) -> Result<Option<StudentRecord>> {
        Ok(self.students.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl EnrollmentStore for MemStores {
    async fn find_by_id(&self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>> {
        Ok(self.enrollments.lock().unwrap().get(&id).cloned())
    }

    async fn find_active_by_student(&self, student_id: StudentId) -> Result<Option<EnrollmentRecord>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .values()
            .find(|e| e.student_id == student_id && e.canceled_at.is_none())
            .cloned())
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<EnrollmentRecord>> {
        let mut records: Vec<_> = self
            .enrollments
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect();
        records.sort_by_key(|e| e.start_date);
        Ok(records)
    }

    async fn create(&self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentRecord> {
        let now = Utc::now();
        let record = EnrollmentRecord {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            plan_id: request.plan_id,
            start_date: request.start_date,
            end_date: request.end_date,
            price: request.price,
            canceled_at: None,
            created_by: request.created_by,
            created_at: now,
            updated_at: now,
        };
        self.enrollments.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: EnrollmentId, request: &EnrollmentUpdateDBRequest) -> Result<EnrollmentRecord> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let record = enrollments.get_mut(&id).ok_or(DbError::NotFound)?;
        record.plan_id = request.plan_id;
        record.start_date = request.start_date;
        record.end_date = request.end_date;
        record.price = request.price;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn cancel(&self, id: EnrollmentId, at: DateTime<Utc>) -> Result<EnrollmentRecord> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let record = enrollments.get_mut(&id).ok_or(DbError::NotFound)?;
        if record.canceled_at.is_some() {
            return Err(DbError::NotFound);
        }
        record.canceled_at = Some(at);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[async_trait]
impl CheckinStore for MemStores {
    async fn create(&self, student_id: StudentId, at: DateTime<Utc>) -> Result<CheckinRecord> {
        let record = CheckinRecord {
            id: Uuid::new_v4(),
            student_id,
            created_at: at,
        };
        self.checkins.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_student_in_range(
        &self,
        student_id: StudentId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CheckinRecord>> {
        Ok(self
            .checkins
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.student_id == student_id && c.created_at >= from && c.created_at < to)
            .cloned()
            .collect())
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<CheckinRecord>> {
        let mut records: Vec<_> = self
            .checkins
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

/// Lifecycle manager wired against in-memory stores, plus the receiving end
/// of its notification channel.
pub fn lifecycle_manager(
    stores: &Arc<MemStores>,
    clock: Arc<FixedClock>,
) -> (EnrollmentLifecycleManager, UnboundedReceiver<EnrollmentEvent>) {
    let (dispatcher, events) = NotificationDispatcher::channel();
    let manager = EnrollmentLifecycleManager::new(
        stores.clone(),
        stores.clone(),
        stores.clone(),
        clock,
        Arc::new(StudentLocks::new()),
        dispatcher,
    );
    (manager, events)
}

/// Eligibility engine wired against in-memory stores.
pub fn eligibility_engine(stores: &Arc<MemStores>, clock: Arc<FixedClock>, weekly_limit: u32) -> CheckinEligibilityEngine {
    CheckinEligibilityEngine::new(
        stores.clone(),
        stores.clone(),
        stores.clone(),
        clock,
        Arc::new(StudentLocks::new()),
        weekly_limit,
    )
}

pub fn sample_enrollment_event() -> EnrollmentEvent {
    EnrollmentEvent {
        kind: EnrollmentEventKind::Created,
        student_id: Uuid::new_v4(),
        student_name: "Ana Souza".to_string(),
        student_email: "ana@example.com".to_string(),
        plan_title: "Gold".to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 4, 1),
        price: dec("327.00"),
    }
}

/// A config suitable for tests: session secret set, email and uploads
/// pointed at a temporary directory.
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config {
        secret_key: Some("test-secret-key".to_string()),
        ..Default::default()
    };
    config.email.enabled = true;
    config.email.transport = EmailTransportConfig::File {
        path: dir.join("emails").to_string_lossy().into_owned(),
    };
    config.uploads.dir = dir.join("uploads");
    config
}
