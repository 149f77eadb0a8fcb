//! In-memory registry of contractors and orders
//!
//! Everything lives behind one async mutex; the service keeps no state
//! across restarts.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::types::{Category, Executor, ExecutorStatus, Order, OrderDraft};

#[derive(Default)]
struct RegistryInner {
    executors: HashMap<i64, Executor>,
    orders: HashMap<u64, Order>,
    last_order_id: u64,
}

/// Outcome of a contractor pressing "take" on an order card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Response recorded; carries the order and contractor for the notification
    Accepted { order: Order, executor: Executor },
    /// No order with that id
    UnknownOrder,
    /// Sender is not an approved contractor
    NotApproved,
}

/// Contractors grouped by moderation status, each group sorted by user id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorsByStatus {
    pub pending: Vec<Executor>,
    pub approved: Vec<Executor>,
    pub blocked: Vec<Executor>,
}

/// Shared registry handle, cheap to clone
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a contractor registration, replacing any earlier record for the same user.
    ///
    /// A re-registration always goes back to `pending`.
    pub async fn register_executor(&self, mut executor: Executor) -> Executor {
        executor.status = ExecutorStatus::Pending;
        let mut inner = self.inner.lock().await;
        inner.executors.insert(executor.user_id, executor.clone());
        executor
    }

    pub async fn executor(&self, user_id: i64) -> Option<Executor> {
        self.inner.lock().await.executors.get(&user_id).cloned()
    }

    /// Changes a contractor's status, returning the updated record
    pub async fn set_executor_status(&self, user_id: i64, status: ExecutorStatus) -> Option<Executor> {
        let mut inner = self.inner.lock().await;
        let executor = inner.executors.get_mut(&user_id)?;
        executor.status = status;
        Some(executor.clone())
    }

    pub async fn executors_by_status(&self) -> ExecutorsByStatus {
        let inner = self.inner.lock().await;
        let mut all: Vec<Executor> = inner.executors.values().cloned().collect();
        all.sort_by_key(|e| e.user_id);

        let mut grouped = ExecutorsByStatus::default();
        for executor in all {
            match executor.status {
                ExecutorStatus::Pending => grouped.pending.push(executor),
                ExecutorStatus::Approved => grouped.approved.push(executor),
                ExecutorStatus::Blocked => grouped.blocked.push(executor),
            }
        }
        grouped
    }

    /// Approved contractors serving the category, sorted by user id
    pub async fn matching_executors(&self, category: Category) -> Vec<Executor> {
        let inner = self.inner.lock().await;
        let mut targets: Vec<Executor> = inner
            .executors
            .values()
            .filter(|e| e.serves(category))
            .cloned()
            .collect();
        targets.sort_by_key(|e| e.user_id);
        targets
    }

    /// Assigns the next sequential id (starting at 1) and stores the order
    pub async fn create_order(&self, draft: OrderDraft) -> Order {
        let mut inner = self.inner.lock().await;
        inner.last_order_id += 1;
        let order = Order::from_draft(inner.last_order_id, draft);
        inner.orders.insert(order.id, order.clone());
        order
    }

    pub async fn order(&self, id: u64) -> Option<Order> {
        self.inner.lock().await.orders.get(&id).cloned()
    }

    /// Most recent orders first, at most `limit`
    pub async fn recent_orders(&self, limit: usize) -> Vec<Order> {
        let inner = self.inner.lock().await;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        orders.truncate(limit);
        orders
    }

    /// Records that a contractor wants to take an order.
    ///
    /// Pressing "take" twice is harmless; the response set keeps one entry.
    pub async fn record_response(&self, order_id: u64, executor_id: i64) -> ResponseOutcome {
        let mut inner = self.inner.lock().await;

        let executor = match inner.executors.get(&executor_id) {
            Some(e) if e.is_approved() => e.clone(),
            _ => {
                if inner.orders.contains_key(&order_id) {
                    return ResponseOutcome::NotApproved;
                }
                return ResponseOutcome::UnknownOrder;
            }
        };

        match inner.orders.get_mut(&order_id) {
            Some(order) => {
                order.responses.insert(executor_id);
                ResponseOutcome::Accepted {
                    order: order.clone(),
                    executor,
                }
            }
            None => ResponseOutcome::UnknownOrder,
        }
    }
}
