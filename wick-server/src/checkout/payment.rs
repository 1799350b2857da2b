//! Payment initiation and verification
//!
//! Initiation creates a gateway order and binds its id to the local order,
//! at most once. Verification checks the callback signature in constant
//! time, then the order binding, then flips the order to paid through a
//! guarded write. Replayed callbacks for an already-paid order succeed
//! without touching state.

use crate::checkout::money::to_minor_units;
use crate::db::models::{Order, PaymentVerification};
use crate::db::repository::OrderRepository;
use crate::payments::{GatewayError, GatewayOrder, RazorpayClient, verify_payment_signature};
use crate::utils::{AppError, AppResult};

/// Currency the storefront charges in
const CURRENCY: &str = "INR";

/// Outcome of a verification callback
#[derive(Debug)]
pub enum VerifyOutcome {
    /// This call transitioned the order to paid
    Verified(Box<Order>),
    /// The order was already paid; nothing was written
    AlreadyPaid,
}

/// Create a gateway order for an unpaid local order and bind its id
pub async fn initiate_payment(
    orders: &OrderRepository,
    gateway: &RazorpayClient,
    order_id: &str,
) -> AppResult<GatewayOrder> {
    let order = orders
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

    if order.is_paid {
        return Err(AppError::invalid("Order already paid"));
    }
    if order.razorpay_order_id.is_some() {
        return Err(AppError::invalid("Payment already initiated for this order"));
    }

    let amount_minor = to_minor_units(order.total_price);
    if amount_minor <= 0 {
        return Err(AppError::validation("Order total must be positive"));
    }

    let receipt = order
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| order_id.to_string());

    let gateway_order = gateway
        .create_order(amount_minor, CURRENCY, &receipt)
        .await
        .map_err(map_gateway_error)?;

    // Set-once binding; a concurrent initiation may have won the race
    let bound = orders
        .bind_gateway_order(order_id, &gateway_order.id)
        .await?;
    if !bound {
        return Err(AppError::invalid("Payment already initiated for this order"));
    }

    tracing::info!(
        order = %order_id,
        gateway_order = %gateway_order.id,
        amount_minor,
        "Gateway order created"
    );

    Ok(gateway_order)
}

/// Handle the signed payment callback
pub async fn verify_payment(
    orders: &OrderRepository,
    key_secret: &str,
    callback: PaymentVerification,
) -> AppResult<VerifyOutcome> {
    // 1. Signature first; nothing else is trusted until this passes
    let signature_ok = verify_payment_signature(
        key_secret,
        &callback.razorpay_order_id,
        &callback.razorpay_payment_id,
        &callback.razorpay_signature,
    );
    if !signature_ok {
        tracing::warn!(order = %callback.order_id, "Payment signature mismatch");
        return Err(AppError::invalid("Invalid payment signature"));
    }

    // 2. The order this payment claims to settle
    let order = orders
        .find_by_id(&callback.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", callback.order_id)))?;

    // 3. Duplicate callbacks are fine; answer without writing
    if order.is_paid {
        return Ok(VerifyOutcome::AlreadyPaid);
    }

    // 4. The signed gateway order must be the one this order created.
    //    A valid signature for some other order must not settle this one.
    if order.razorpay_order_id.as_deref() != Some(callback.razorpay_order_id.as_str()) {
        tracing::warn!(
            order = %callback.order_id,
            claimed = %callback.razorpay_order_id,
            "Gateway order id does not match the order"
        );
        return Err(AppError::invalid("Payment does not belong to this order"));
    }

    // 5. Guarded transition; the loser of a concurrent race sees no-op
    let gateway_response = serde_json::json!({
        "razorpay_order_id": callback.razorpay_order_id,
        "razorpay_payment_id": callback.razorpay_payment_id,
        "razorpay_signature": callback.razorpay_signature,
    });
    let transitioned = orders
        .mark_paid(&callback.order_id, &callback.razorpay_payment_id, gateway_response)
        .await?;
    if !transitioned {
        return Ok(VerifyOutcome::AlreadyPaid);
    }

    let order = orders
        .find_by_id(&callback.order_id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after payment"))?;

    tracing::info!(
        order = %callback.order_id,
        payment = %callback.razorpay_payment_id,
        "Payment verified"
    );

    Ok(VerifyOutcome::Verified(Box::new(order)))
}

fn map_gateway_error(err: GatewayError) -> AppError {
    match err {
        GatewayError::NotConfigured => {
            AppError::internal("Payment gateway is not configured")
        }
        GatewayError::Request(e) => AppError::internal(format!("Gateway request failed: {e}")),
        GatewayError::Api { status, body } => {
            AppError::internal(format!("Gateway error {status}: {body}"))
        }
    }
}
