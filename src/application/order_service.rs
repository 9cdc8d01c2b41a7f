use uuid::Uuid;

use crate::domain::catalog::{Page, PageRequest};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, OrderView, StatusChange};
use crate::domain::ports::OrderRepository;
use crate::payment::{PaymentNotification, PaymentOutcome};

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Order"))
    }

    pub fn get_order_by_reference(&self, reference: &str) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_reference(reference.trim())?
            .ok_or_else(|| DomainError::not_found("Order"))
    }

    pub fn list_orders_for_profile(
        &self,
        profile_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<OrderView>, DomainError> {
        self.repo.list_for_profile(profile_id, page)
    }

    /// Moves `order` to `next` if the transition table allows it.
    fn transition(
        &self,
        order: &OrderView,
        next: OrderStatus,
        transaction_id: Option<&str>,
    ) -> Result<StatusChange, DomainError> {
        let current = order.status;
        if current == next {
            return Ok(StatusChange::Unchanged(current));
        }
        if !current.can_transition_to(next) {
            return Ok(StatusChange::Rejected {
                current,
                requested: next,
            });
        }
        if self.repo.update_status(order.id, current, next, transaction_id)? {
            log::info!("Order {} moved {} -> {}", order.reference, current, next);
            return Ok(StatusChange::Applied { from: current, to: next });
        }

        // Lost a race with another writer; report against the fresh status.
        let fresh = self
            .repo
            .find_by_id(order.id)?
            .ok_or_else(|| DomainError::not_found("Order"))?;
        if fresh.status == next {
            Ok(StatusChange::Unchanged(next))
        } else {
            Ok(StatusChange::Rejected {
                current: fresh.status,
                requested: next,
            })
        }
    }

    pub fn cancel_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        let order = self.get_order(id)?;
        match self.transition(&order, OrderStatus::Canceled, None)? {
            StatusChange::Applied { .. } | StatusChange::Unchanged(_) => self.get_order(id),
            StatusChange::Rejected { current, .. } => Err(DomainError::Conflict(format!(
                "a {current} order cannot be canceled"
            ))),
        }
    }

    pub fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<OrderView, DomainError> {
        let order = self.get_order(id)?;
        match self.transition(&order, next, None)? {
            StatusChange::Applied { .. } | StatusChange::Unchanged(_) => self.get_order(id),
            StatusChange::Rejected { current, requested } => Err(DomainError::Conflict(format!(
                "cannot move order from {current} to {requested}"
            ))),
        }
    }

    /// Applies a gateway callback. Unknown statuses, duplicates and
    /// out-of-order deliveries are acknowledged without changing the order.
    pub fn apply_payment_notification(
        &self,
        notification: &PaymentNotification,
    ) -> Result<StatusChange, DomainError> {
        let reference = notification.order_reference()?;
        let order = self
            .repo
            .find_by_reference(reference)?
            .ok_or_else(|| DomainError::not_found("Order"))?;

        let outcome = notification.outcome();
        let Some(next) = outcome.target_status() else {
            log::warn!(
                "Ignoring payment status '{}' for order {}",
                notification.status,
                reference
            );
            return Ok(StatusChange::Unchanged(order.status));
        };

        let transaction_id = match outcome {
            PaymentOutcome::Paid => notification.transaction_id.as_deref(),
            _ => None,
        };
        let change = self.transition(&order, next, transaction_id)?;
        if let StatusChange::Rejected { current, requested } = change {
            log::warn!(
                "Payment callback for {} wants {} but order is {}",
                reference,
                requested,
                current
            );
        }
        Ok(change)
    }
}
