// In-memory repositories
//
// Implements every repository trait over one shared set of tables so the
// full route table can run without MySQL. Ordering, scoping by user and
// uniqueness rules follow the SQL implementations.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use transport_ops::app::Repositories;
use transport_ops::core::{AppError, DateRange, Result};
use transport_ops::modules::audit::models::AuditLog;
use transport_ops::modules::audit::repositories::AuditRepository;
use transport_ops::modules::auth::models::{Session, User};
use transport_ops::modules::auth::repositories::{SessionRepository, UserRepository};
use transport_ops::modules::expenses::models::{
    Expense, ExpenseFilter, ExpenseType, ExpenseTypeTotal,
};
use transport_ops::modules::expenses::repositories::ExpenseRepository;
use transport_ops::modules::maintenance::models::{MaintenanceRecord, MaintenanceResponse};
use transport_ops::modules::maintenance::repositories::MaintenanceRepository;
use transport_ops::modules::trips::models::{Trip, TripFilter, TripResponse};
use transport_ops::modules::trips::repositories::{TripRepository, TripTotals};
use transport_ops::modules::trips::services::compute_net_profit;
use transport_ops::modules::vehicles::models::{Vehicle, VehicleStatus};
use transport_ops::modules::vehicles::repositories::VehicleRepository;

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
    pub vehicles: Vec<Vehicle>,
    pub trips: Vec<Trip>,
    pub expenses: Vec<Expense>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub audit: Vec<AuditLog>,
}

impl Tables {
    fn plate_of(&self, vehicle_id: &str) -> Option<String> {
        self.vehicles
            .iter()
            .find(|v| v.id == vehicle_id)
            .map(|v| v.license_plate.clone())
    }

    fn expenses_for_trip(&self, trip_id: &str, user_id: &str) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| e.user_id == user_id && e.trip_id.as_deref() == Some(trip_id))
            .map(|e| e.amount)
            .sum()
    }
}

/// Shared handle; clones see the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(MemoryUsers(self.clone())),
            sessions: Arc::new(MemorySessions(self.clone())),
            vehicles: Arc::new(MemoryVehicles(self.clone())),
            trips: Arc::new(MemoryTrips(self.clone())),
            expenses: Arc::new(MemoryExpenses(self.clone())),
            maintenance: Arc::new(MemoryMaintenance(self.clone())),
            audit: Arc::new(MemoryAudit(self.clone())),
        }
    }

    pub fn audit_entries(&self) -> Vec<AuditLog> {
        self.lock().audit.clone()
    }

    pub fn stored_trip(&self, id: &str) -> Option<Trip> {
        self.lock().trips.iter().find(|t| t.id == id).cloned()
    }
}

fn in_range(date: NaiveDate, range: Option<&DateRange>) -> bool {
    range.map_or(true, |r| r.contains_date(date))
}

pub struct MemoryUsers(MemoryStore);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, user: &User) -> Result<User> {
        let mut tables = self.0.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email is already registered"));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.0.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.0.lock().users.iter().find(|u| u.id == id).cloned())
    }
}

pub struct MemorySessions(MemoryStore);

#[async_trait]
impl SessionRepository for MemorySessions {
    async fn create(&self, session: &Session) -> Result<()> {
        self.0.lock().sessions.push(session.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Session, User)>> {
        let tables = self.0.lock();
        let Some(session) = tables
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash && s.expires_at > now)
        else {
            return Ok(None);
        };
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == session.user_id)
            .map(|user| (session.clone(), user.clone())))
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool> {
        let mut tables = self.0.lock();
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.token_hash != token_hash);
        Ok(tables.sessions.len() < before)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.0.lock();
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.expires_at > now);
        Ok((before - tables.sessions.len()) as u64)
    }
}

pub struct MemoryVehicles(MemoryStore);

#[async_trait]
impl VehicleRepository for MemoryVehicles {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let mut tables = self.0.lock();
        if tables
            .vehicles
            .iter()
            .any(|v| v.license_plate == vehicle.license_plate)
        {
            return Err(AppError::conflict(format!(
                "Vehicle with plate '{}' already exists",
                vehicle.license_plate
            )));
        }
        tables.vehicles.push(vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Vehicle>> {
        Ok(self
            .0
            .lock()
            .vehicles
            .iter()
            .find(|v| v.id == id && v.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str, status: Option<VehicleStatus>) -> Result<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .0
            .lock()
            .vehicles
            .iter()
            .filter(|v| v.user_id == user_id && status.map_or(true, |s| v.status == s))
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| Reverse(v.created_at));
        Ok(vehicles)
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let mut tables = self.0.lock();
        if tables
            .vehicles
            .iter()
            .any(|v| v.id != vehicle.id && v.license_plate == vehicle.license_plate)
        {
            return Err(AppError::conflict(format!(
                "Vehicle with plate '{}' already exists",
                vehicle.license_plate
            )));
        }
        if let Some(stored) = tables
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle.id && v.user_id == vehicle.user_id)
        {
            *stored = vehicle.clone();
        }
        Ok(vehicle.clone())
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut tables = self.0.lock();
        let before = tables.vehicles.len();
        tables
            .vehicles
            .retain(|v| !(v.id == id && v.user_id == user_id));
        let deleted = tables.vehicles.len() < before;
        if deleted {
            tables.maintenance.retain(|m| m.vehicle_id != id);
        }
        Ok(deleted)
    }

    async fn count_by_status(&self, user_id: &str, status: VehicleStatus) -> Result<i64> {
        Ok(self
            .0
            .lock()
            .vehicles
            .iter()
            .filter(|v| v.user_id == user_id && v.status == status)
            .count() as i64)
    }
}

pub struct MemoryTrips(MemoryStore);

#[async_trait]
impl TripRepository for MemoryTrips {
    async fn create(&self, trip: &Trip) -> Result<Trip> {
        self.0.lock().trips.push(trip.clone());
        Ok(trip.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Trip>> {
        Ok(self
            .0
            .lock()
            .trips
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<TripResponse>> {
        let tables = self.0.lock();
        let mut trips: Vec<&Trip> = tables
            .trips
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .collect();
        trips.sort_by_key(|t| Reverse((t.trip_date, t.created_at)));

        let limit = filter.limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(trips
            .into_iter()
            .take(limit)
            .map(|t| TripResponse {
                trip: t.clone(),
                vehicle_license_plate: tables.plate_of(&t.vehicle_id),
                total_expenses: tables.expenses_for_trip(&t.id, user_id),
            })
            .collect())
    }

    async fn update(&self, trip: &Trip) -> Result<Trip> {
        let mut tables = self.0.lock();
        let total_expenses = tables.expenses_for_trip(&trip.id, &trip.user_id);
        let Some(stored) = tables
            .trips
            .iter_mut()
            .find(|t| t.id == trip.id && t.user_id == trip.user_id)
        else {
            return Err(AppError::not_found("Trip not found"));
        };

        let mut trip = trip.clone();
        trip.rederive(total_expenses);
        *stored = trip.clone();
        Ok(trip)
    }

    async fn recompute_net_profit(&self, id: &str, user_id: &str) -> Result<Option<Decimal>> {
        let mut tables = self.0.lock();
        let total_expenses = tables.expenses_for_trip(id, user_id);
        Ok(tables
            .trips
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .map(|stored| {
                stored.net_profit = compute_net_profit(stored.gross_profit, total_expenses);
                stored.net_profit
            }))
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut tables = self.0.lock();
        let before = tables.trips.len();
        tables.trips.retain(|t| !(t.id == id && t.user_id == user_id));
        let deleted = tables.trips.len() < before;
        if deleted {
            for expense in tables
                .expenses
                .iter_mut()
                .filter(|e| e.trip_id.as_deref() == Some(id))
            {
                expense.trip_id = None;
            }
        }
        Ok(deleted)
    }

    async fn totals(&self, user_id: &str, range: Option<&DateRange>) -> Result<TripTotals> {
        let mut totals = TripTotals::default();
        for trip in self
            .0
            .lock()
            .trips
            .iter()
            .filter(|t| t.user_id == user_id && in_range(t.trip_date, range))
        {
            totals.add(trip);
        }
        Ok(totals)
    }

    async fn exists_for_vehicle(&self, vehicle_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .0
            .lock()
            .trips
            .iter()
            .any(|t| t.vehicle_id == vehicle_id && t.user_id == user_id))
    }
}

pub struct MemoryExpenses(MemoryStore);

#[async_trait]
impl ExpenseRepository for MemoryExpenses {
    async fn create(&self, expense: &Expense) -> Result<Expense> {
        self.0.lock().expenses.push(expense.clone());
        Ok(expense.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Expense>> {
        Ok(self
            .0
            .lock()
            .expenses
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .0
            .lock()
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect();
        expenses.sort_by_key(|e| Reverse((e.expense_date, e.created_at)));
        Ok(expenses)
    }

    async fn update(&self, expense: &Expense) -> Result<Expense> {
        let mut tables = self.0.lock();
        if let Some(stored) = tables
            .expenses
            .iter_mut()
            .find(|e| e.id == expense.id && e.user_id == expense.user_id)
        {
            *stored = expense.clone();
        }
        Ok(expense.clone())
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut tables = self.0.lock();
        let before = tables.expenses.len();
        tables
            .expenses
            .retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(tables.expenses.len() < before)
    }

    async fn total_for_trip(&self, trip_id: &str, user_id: &str) -> Result<Decimal> {
        Ok(self.0.lock().expenses_for_trip(trip_id, user_id))
    }

    async fn total(&self, user_id: &str, range: Option<&DateRange>) -> Result<Decimal> {
        Ok(self
            .0
            .lock()
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id && in_range(e.expense_date, range))
            .map(|e| e.amount)
            .sum())
    }

    async fn totals_by_type(
        &self,
        user_id: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<ExpenseTypeTotal>> {
        let tables = self.0.lock();
        let mut totals: Vec<ExpenseTypeTotal> = ExpenseType::ALL
            .into_iter()
            .filter_map(|expense_type| {
                let matching: Vec<Decimal> = tables
                    .expenses
                    .iter()
                    .filter(|e| {
                        e.user_id == user_id
                            && e.expense_type == expense_type
                            && in_range(e.expense_date, range)
                    })
                    .map(|e| e.amount)
                    .collect();
                (!matching.is_empty()).then(|| ExpenseTypeTotal {
                    expense_type,
                    label: expense_type.label(),
                    total: matching.into_iter().sum(),
                })
            })
            .collect();
        totals.sort_by_key(|t| Reverse(t.total));
        Ok(totals)
    }
}

pub struct MemoryMaintenance(MemoryStore);

impl MemoryMaintenance {
    fn respond(tables: &Tables, record: &MaintenanceRecord) -> MaintenanceResponse {
        MaintenanceResponse {
            record: record.clone(),
            vehicle_license_plate: tables.plate_of(&record.vehicle_id),
        }
    }
}

#[async_trait]
impl MaintenanceRepository for MemoryMaintenance {
    async fn create(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord> {
        self.0.lock().maintenance.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<MaintenanceRecord>> {
        Ok(self
            .0
            .lock()
            .maintenance
            .iter()
            .find(|m| m.id == id && m.user_id == user_id)
            .cloned())
    }

    async fn list(
        &self,
        user_id: &str,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<MaintenanceResponse>> {
        let tables = self.0.lock();
        let mut records: Vec<&MaintenanceRecord> = tables
            .maintenance
            .iter()
            .filter(|m| m.user_id == user_id && vehicle_id.map_or(true, |v| m.vehicle_id == v))
            .collect();
        records.sort_by_key(|m| Reverse((m.maintenance_date, m.created_at)));
        Ok(records
            .into_iter()
            .map(|m| Self::respond(&tables, m))
            .collect())
    }

    async fn upcoming(
        &self,
        user_id: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MaintenanceResponse>> {
        let tables = self.0.lock();
        let mut records: Vec<&MaintenanceRecord> = tables
            .maintenance
            .iter()
            .filter(|m| {
                m.user_id == user_id
                    && m.next_due_date.is_some_and(|due| due >= from && due <= until)
            })
            .collect();
        records.sort_by_key(|m| m.next_due_date);
        Ok(records
            .into_iter()
            .map(|m| Self::respond(&tables, m))
            .collect())
    }

    async fn update(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord> {
        let mut tables = self.0.lock();
        if let Some(stored) = tables
            .maintenance
            .iter_mut()
            .find(|m| m.id == record.id && m.user_id == record.user_id)
        {
            *stored = record.clone();
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut tables = self.0.lock();
        let before = tables.maintenance.len();
        tables
            .maintenance
            .retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(tables.maintenance.len() < before)
    }

    async fn total_cost(&self, user_id: &str, range: Option<&DateRange>) -> Result<Decimal> {
        Ok(self
            .0
            .lock()
            .maintenance
            .iter()
            .filter(|m| m.user_id == user_id && in_range(m.maintenance_date, range))
            .map(|m| m.cost)
            .sum())
    }
}

pub struct MemoryAudit(MemoryStore);

#[async_trait]
impl AuditRepository for MemoryAudit {
    async fn record(&self, entry: &AuditLog) -> Result<()> {
        self.0.lock().audit.push(entry.clone());
        Ok(())
    }
}
