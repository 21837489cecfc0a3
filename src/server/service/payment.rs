//! Payment-gated reservation flow.
//!
//! No seat is held while the patient pays. Verification claims the seat only after the
//! gateway signature checks out; if the slot can no longer be booked at that point the
//! captured amount is refunded through the gateway instead.

use chrono::Utc;
use entity::sea_orm_active_enums::{PaymentStatus, RefundStatus};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{booking::BookingRepository, payment::PaymentRepository, slot::SlotRepository},
    error::{booking::BookingError, payment::PaymentError, AppError},
    gateway::{CreateOrderRequest, PaymentGateway, RefundRequest},
    model::{
        booking::Requester,
        payment::{NewPaymentParams, Payment, RefundResult, VerifyOutcome, VerifyPaymentParams},
        slot::Slot,
    },
    service::{booking::BookingService, cancellation::CancellationService},
    util::signature,
};

const AUTO_REFUND_REASON: &str = "Booking could not be completed after payment";

pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn PaymentGateway,
    key_secret: &'a str,
}

impl<'a> PaymentService<'a> {
    /// Creates a payment service.
    ///
    /// # Arguments
    /// - `db` - Database connection
    /// - `gateway` - Gateway used for orders and refunds
    /// - `key_secret` - Gateway secret used to check payment signatures
    pub fn new(
        db: &'a DatabaseConnection,
        gateway: &'a dyn PaymentGateway,
        key_secret: &'a str,
    ) -> Self {
        Self {
            db,
            gateway,
            key_secret,
        }
    }

    /// Opens a gateway order for a patient's booking without reserving a seat.
    ///
    /// Availability and duplicate checks here are advisory; they are repeated when the
    /// payment is verified.
    ///
    /// # Returns
    /// - `Ok(Payment)` - Pending payment carrying the gateway order id
    /// - `Err(AppError::BookingErr)` - Slot not bookable or patient already booked
    /// - `Err(AppError::GatewayErr)` - Gateway refused the order
    pub async fn create_order(&self, account_id: i32, slot_id: i32) -> Result<Payment, AppError> {
        let patient = BookingService::new(self.db)
            .resolve_patient(Requester::Patient { account_id })
            .await?;

        let slot = SlotRepository::new(self.db)
            .find_by_id(slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(slot_id))?;
        let slot = Slot::from_entity(slot)?;
        slot.ensure_bookable()?;

        if BookingRepository::new(self.db)
            .find_active(patient.id, slot_id)
            .await?
            .is_some()
        {
            return Err(BookingError::DuplicateBooking {
                patient_id: patient.id,
                slot_id,
            }
            .into());
        }

        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount: slot.price,
                currency: slot.currency.clone(),
                receipt: format!("receipt_{}", Utc::now().timestamp_millis()),
                account_id,
                slot_id,
                slot_label: slot.label(),
            })
            .await?;

        let payment = PaymentRepository::new(self.db)
            .create(NewPaymentParams {
                account_id,
                slot_id,
                amount: order.amount,
                currency: order.currency,
                order_id: order.id,
            })
            .await?;

        tracing::info!(
            "Created payment order {} for slot {} by account {}",
            payment.order_id,
            slot_id,
            account_id
        );

        Ok(Payment::from_entity(payment))
    }

    /// Verifies a gateway payment and turns it into a booking.
    ///
    /// A signature mismatch marks the payment failed. A valid payment is marked succeeded
    /// and then booked through the reservation engine; if booking fails for any reason the
    /// captured amount is refunded automatically.
    ///
    /// # Returns
    /// - `Ok(VerifyOutcome::Booked)` - Booking created and linked to the payment
    /// - `Ok(VerifyOutcome::Refunded)` - No booking possible, payment refunded
    /// - `Err(PaymentError::RefundFailed)` - No booking possible and the refund failed
    pub async fn verify_and_book(
        &self,
        account_id: i32,
        params: VerifyPaymentParams,
    ) -> Result<VerifyOutcome, AppError> {
        let repo = PaymentRepository::new(self.db);

        let payment = repo
            .find_by_order_id(&params.order_id)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(params.order_id.clone()))?;

        if payment.account_id != account_id {
            return Err(PaymentError::NotPaymentOwner {
                account_id,
                payment_id: payment.id,
            }
            .into());
        }

        if payment.status == PaymentStatus::Succeeded {
            return Err(PaymentError::AlreadyVerified(payment.order_id).into());
        }

        if !signature::verify(
            self.key_secret,
            &payment.order_id,
            &params.gateway_payment_id,
            &params.signature,
        ) {
            repo.mark_failed(payment.id, &params.gateway_payment_id, &params.signature)
                .await?;

            tracing::warn!("Signature mismatch for payment order {}", payment.order_id);

            return Err(PaymentError::InvalidSignature(payment.order_id).into());
        }

        let Some(payment) = repo
            .mark_succeeded(payment.id, &params.gateway_payment_id, &params.signature)
            .await?
        else {
            return Err(PaymentError::AlreadyVerified(payment.order_id).into());
        };
        let payment = Payment::from_entity(payment);

        let booking_service = BookingService::new(self.db);
        let booked = match booking_service
            .resolve_patient(Requester::Patient { account_id })
            .await
        {
            Ok(patient) => {
                booking_service
                    .reserve(account_id, &patient, payment.slot_id, Some(payment.id))
                    .await
            }
            Err(err) => Err(err),
        };

        match booked {
            Ok(booking) => {
                let payment = self.link_booking(payment, booking.id).await;

                Ok(VerifyOutcome::Booked { booking, payment })
            }
            Err(err) => {
                tracing::warn!(
                    "Payment order {} captured but booking failed: {}, refunding",
                    payment.order_id,
                    err
                );

                let message = refund_message(&err);
                let payment = self.auto_refund(payment).await?;

                Ok(VerifyOutcome::Refunded { payment, message })
            }
        }
    }

    /// Links a paid payment to the booking it produced.
    ///
    /// The booking already stands, so a failed link is logged and the unlinked payment
    /// returned.
    pub(crate) async fn link_booking(&self, payment: Payment, booking_id: i32) -> Payment {
        match PaymentRepository::new(self.db)
            .set_booking(payment.id, booking_id)
            .await
        {
            Ok(linked) => Payment::from_entity(linked),
            Err(e) => {
                tracing::error!(
                    "Booking {} created for payment order {} but linking them failed: {}",
                    booking_id,
                    payment.order_id,
                    e
                );

                payment
            }
        }
    }

    /// Refunds a captured payment that produced no booking.
    async fn auto_refund(&self, payment: Payment) -> Result<Payment, AppError> {
        let repo = PaymentRepository::new(self.db);

        let Some(gateway_payment_id) = payment.gateway_payment_id.clone() else {
            return Err(AppError::InternalError(format!(
                "Payment {} succeeded without a gateway payment id",
                payment.id
            )));
        };

        repo.set_refund_status(payment.id, RefundStatus::Pending)
            .await?;

        let refund = self
            .gateway
            .refund(RefundRequest {
                payment_id: gateway_payment_id,
                amount: payment.amount,
                reason: AUTO_REFUND_REASON.to_string(),
            })
            .await;

        match refund {
            Ok(refund) => {
                let refunded = repo
                    .mark_refunded(payment.id, refund.id, refund.amount)
                    .await?;

                tracing::info!("Automatically refunded payment order {}", payment.order_id);

                Ok(Payment::from_entity(refunded))
            }
            Err(e) => {
                tracing::error!(
                    "Automatic refund of payment order {} failed: {}",
                    payment.order_id,
                    e
                );

                repo.set_refund_status(payment.id, RefundStatus::Failed)
                    .await?;

                Err(PaymentError::RefundFailed(payment.order_id).into())
            }
        }
    }

    /// Refunds a captured payment and cancels the booking it paid for.
    ///
    /// # Returns
    /// - `Ok(RefundResult)` - Refunded payment and the cancelled booking, if one was linked
    /// - `Err(PaymentError::AlreadyRefunded)` - Payment was refunded before
    /// - `Err(PaymentError::RefundInProgress)` - Another refund of the payment is running
    /// - `Err(PaymentError::NotRefundable)` - Payment never succeeded
    /// - `Err(AppError::GatewayErr)` - Gateway refused the refund; refund status restored
    pub async fn refund(&self, payment_id: i32) -> Result<RefundResult, AppError> {
        let repo = PaymentRepository::new(self.db);

        let payment = repo
            .find_by_id(payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;

        if payment.refund_status == RefundStatus::Refunded {
            return Err(PaymentError::AlreadyRefunded(payment.id).into());
        }

        if payment.status != PaymentStatus::Succeeded {
            return Err(PaymentError::NotRefundable {
                payment_id,
                reason: "Only successful payments can be refunded".to_string(),
            }
            .into());
        }

        let gateway_payment_id =
            payment
                .gateway_payment_id
                .clone()
                .ok_or_else(|| PaymentError::NotRefundable {
                    payment_id,
                    reason: "Payment has no captured gateway payment".to_string(),
                })?;

        if !repo.claim_refund(payment.id).await? {
            let current = repo.find_by_id(payment.id).await?;

            return Err(match current.map(|p| p.refund_status) {
                Some(RefundStatus::Refunded) => PaymentError::AlreadyRefunded(payment.id),
                _ => PaymentError::RefundInProgress(payment.id),
            }
            .into());
        }

        let refund = self
            .gateway
            .refund(RefundRequest {
                payment_id: gateway_payment_id,
                amount: payment.amount,
                reason: "Refund issued by clinic".to_string(),
            })
            .await;

        let refund = match refund {
            Ok(refund) => refund,
            Err(e) => {
                if let Err(restore) = repo
                    .set_refund_status(payment.id, payment.refund_status)
                    .await
                {
                    tracing::error!(
                        "Failed to reset refund status of payment {}: {}",
                        payment.id,
                        restore
                    );
                }

                return Err(e.into());
            }
        };

        let refunded = repo
            .mark_refunded(payment.id, refund.id, refund.amount)
            .await?;

        let cancelled_booking = match refunded.booking_id {
            Some(booking_id) => {
                CancellationService::new(self.db)
                    .cancel_for_refund(booking_id)
                    .await?
            }
            None => None,
        };

        tracing::info!("Refunded payment order {}", refunded.order_id);

        Ok(RefundResult {
            payment: Payment::from_entity(refunded),
            cancelled_booking,
        })
    }

    /// Gets a payment by order id for its owner or an admin
    pub async fn get_by_order_id(
        &self,
        account_id: i32,
        is_admin: bool,
        order_id: &str,
    ) -> Result<Payment, AppError> {
        let payment = PaymentRepository::new(self.db)
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.to_string()))?;

        if !is_admin && payment.account_id != account_id {
            return Err(PaymentError::NotPaymentOwner {
                account_id,
                payment_id: payment.id,
            }
            .into());
        }

        Ok(Payment::from_entity(payment))
    }

    /// Gets payments made by an account, newest first
    pub async fn get_by_account(&self, account_id: i32) -> Result<Vec<Payment>, AppError> {
        let payments = PaymentRepository::new(self.db)
            .get_by_account(account_id)
            .await?;

        Ok(payments.into_iter().map(Payment::from_entity).collect())
    }

    /// Gets all payments, newest first
    pub async fn get_all(&self) -> Result<Vec<Payment>, AppError> {
        let payments = PaymentRepository::new(self.db).get_all().await?;

        Ok(payments.into_iter().map(Payment::from_entity).collect())
    }
}

fn refund_message(err: &AppError) -> String {
    match err {
        AppError::BookingErr(BookingError::DuplicateBooking { .. }) => {
            "You already have a booking for this slot. Your payment has been refunded automatically."
                .to_string()
        }
        AppError::BookingErr(
            BookingError::SlotFull(_) | BookingError::SlotInactive(_) | BookingError::SlotNotFound(_),
        ) => "The slot became unavailable while your payment was processing. Your payment has been refunded automatically."
            .to_string(),
        _ => "Your booking could not be completed. Your payment has been refunded automatically."
            .to_string(),
    }
}
