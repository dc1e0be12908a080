//! Integration tests for order status presentation and cancellation.

use testresult::TestResult;

use platter::orders::{Order, OrderStatus, StatusIcon, StatusTone, format_status_label, present_status};

fn order_in(status: &str) -> Result<Order, serde_json::Error> {
    serde_json::from_value(serde_json::json!({
        "id": 1,
        "orderNumber": "ORD-1",
        "status": status,
        "totalAmount": 250.0
    }))
}

#[test]
fn every_known_status_has_a_clean_label() {
    for status in OrderStatus::lifecycle() {
        let label = format_status_label(status.as_str());

        assert!(!label.is_empty());
        assert!(!label.contains('_'));
        assert!(label.split(' ').all(|word| {
            let mut chars = word.chars();

            chars.next().is_some_and(char::is_uppercase) && chars.all(char::is_lowercase)
        }));
    }
}

#[test]
fn unknown_statuses_still_render() {
    for raw in ["", "ESCALATED", "on_hold", "  "] {
        let presentation = present_status(raw);

        assert!(!presentation.label.trim().is_empty(), "{raw:?} rendered blank");
        assert_eq!(presentation.icon, StatusIcon::Clock);
        assert_eq!(presentation.tone, StatusTone::Gray);
    }
}

#[test]
fn cancellation_offered_while_preparing_but_not_out_for_delivery() -> TestResult {
    assert!(order_in("PREPARING")?.can_cancel());
    assert!(!order_in("OUT_FOR_DELIVERY")?.can_cancel());

    Ok(())
}

#[test]
fn cancellation_refused_exactly_for_late_statuses() -> TestResult {
    let refused = ["DELIVERED", "CANCELLED", "OUT_FOR_DELIVERY"];

    for status in OrderStatus::lifecycle() {
        let order = order_in(status.as_str())?;

        assert_eq!(
            order.can_cancel(),
            !refused.contains(&status.as_str()),
            "{status}"
        );
    }

    assert!(order_in("SOMETHING_NEW")?.can_cancel());

    Ok(())
}

#[test]
fn order_list_and_detail_share_one_presentation() -> TestResult {
    let order = order_in("READY_FOR_PICKUP")?;

    assert_eq!(order.presentation(), present_status("READY_FOR_PICKUP"));
    assert_eq!(order.presentation().label, "Ready For Pickup");
    assert_eq!(order.presentation().tone, StatusTone::Green);

    Ok(())
}
