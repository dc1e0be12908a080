//! Integration tests for the cart screen and the checkout state machine.

use testresult::TestResult;

use platter::{
    cart::{Cart, CartScreen, CheckoutGate},
    checkout::{CheckoutForm, CheckoutState},
    money::Amount,
    orders::{OrderId, PaymentMethod},
    routes::Route,
};

fn cart(json: serde_json::Value) -> Result<Cart, serde_json::Error> {
    serde_json::from_value(json)
}

#[test]
fn empty_cart_never_shows_the_summary() -> TestResult {
    let empty = cart(serde_json::json!({
        "cartItems": [],
        "subtotal": 0,
        "minOrderAmount": 100
    }))?;

    let screen = CartScreen::for_snapshot(Some(&empty));

    assert_eq!(
        screen,
        CartScreen::Empty {
            browse: Route::Restaurants
        }
    );

    Ok(())
}

#[test]
fn subtotal_below_minimum_disables_checkout() -> TestResult {
    let snapshot = cart(serde_json::json!({
        "cartItems": [{"id": 1, "quantity": 2, "price": 40, "totalPrice": 80}],
        "subtotal": 80,
        "minOrderAmount": 100,
        "grandTotal": 120
    }))?;

    let CartScreen::Summary { gate } = CartScreen::for_snapshot(Some(&snapshot)) else {
        return Err("expected the summary screen".into());
    };

    assert_eq!(
        gate,
        CheckoutGate::BelowMinimum {
            shortfall: Amount::from_minor(20_00)
        }
    );
    assert_eq!(
        gate.message().as_deref(),
        Some("Add ₹20.00 more to meet the minimum order amount")
    );

    Ok(())
}

#[test]
fn cash_on_delivery_checkout_never_waits_for_payment() -> TestResult {
    let form = CheckoutForm {
        delivery_address: "221B Baker Street".to_string(),
        customer_phone: "9876543210".to_string(),
        payment_method: Some(PaymentMethod::CashOnDelivery),
        special_instructions: String::new(),
    };

    let request = form.validate().map_err(|errors| format!("{errors:?}"))?;
    let mut state = CheckoutState::default();
    let mut visited = vec![state.clone()];

    state.begin_submission()?;
    visited.push(state.clone());

    state.order_created(OrderId::new(9), "ORD-9".to_string(), request.payment_method)?;
    visited.push(state.clone());

    assert!(
        !visited
            .iter()
            .any(|state| matches!(state, CheckoutState::PaymentPending { .. }))
    );
    assert_eq!(state, CheckoutState::Completed { order_id: OrderId::new(9) });

    Ok(())
}

#[test]
fn only_one_submission_is_accepted() -> TestResult {
    let mut state = CheckoutState::default();

    state.begin_submission()?;

    assert!(state.begin_submission().is_err());
    assert!(state.begin_submission().is_err());

    Ok(())
}
