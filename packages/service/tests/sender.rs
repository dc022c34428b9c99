mod support;

use common::{MessageStatus, SmsMessage};
use service::{BroadcastService, SendOutcome};
use support::{
    AcceptingGateway, RecordingPublisher, RejectingGateway, UnreachableGateway, fresh_service,
};
use uuid::Uuid;

/// Create a broadcast with one recipient and run a publisher cycle, returning
/// the queued message as the worker would receive it from the broker.
async fn queued_message(svc: &BroadcastService) -> SmsMessage {
    svc.create_broadcast("n", "hi", &["+15551234567".into()])
        .await
        .unwrap();

    let broker = RecordingPublisher::default();
    assert_eq!(svc.publish_pending(&broker, 100).await.unwrap(), 1);
    broker.published.lock().unwrap().remove(0)
}

#[tokio::test]
async fn accepted_send_records_provider_id_and_marks_sent() {
    let svc = fresh_service().await;
    let msg = queued_message(&svc).await;

    let provider_id = Uuid::new_v4().to_string();
    let gateway = AcceptingGateway::with_ids([provider_id.clone()]);

    let outcome = svc.send_message(&gateway, &msg).await.unwrap();
    assert_eq!(
        outcome,
        SendOutcome::Sent {
            provider_id: provider_id.clone()
        }
    );

    let row = svc.repository().message(msg.id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Sent);
    assert_eq!(row.provider_id, Some(provider_id));
}

#[tokio::test]
async fn redelivered_send_keeps_the_first_provider_id() {
    let svc = fresh_service().await;
    let msg = queued_message(&svc).await;

    let first = Uuid::new_v4().to_string();
    let second = Uuid::new_v4().to_string();

    svc.send_message(&AcceptingGateway::with_ids([first.clone()]), &msg)
        .await
        .unwrap();

    // The broker redelivers the same payload; the gateway hands out a fresh
    // id, but the row must keep the one already recorded.
    svc.send_message(&AcceptingGateway::with_ids([second.clone()]), &msg)
        .await
        .unwrap();

    let row = svc.repository().message(msg.id).await.unwrap();
    assert_eq!(row.provider_id, Some(first));
    assert_eq!(row.status, MessageStatus::Sent);
}

#[tokio::test]
async fn rejected_send_marks_failed() {
    let svc = fresh_service().await;
    let msg = queued_message(&svc).await;

    let outcome = svc.send_message(&RejectingGateway, &msg).await.unwrap();
    assert_eq!(outcome, SendOutcome::Rejected);

    let row = svc.repository().message(msg.id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Failed);
    assert_eq!(row.provider_id, None);
}

#[tokio::test]
async fn unreachable_gateway_leaves_the_row_queued() {
    let svc = fresh_service().await;
    let msg = queued_message(&svc).await;

    let result = svc.send_message(&UnreachableGateway, &msg).await;
    assert!(result.is_err());

    let row = svc.repository().message(msg.id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Queued);
    assert_eq!(row.provider_id, None);
}

#[tokio::test]
async fn rejecting_gateway_fails_every_message_of_a_broadcast() {
    let svc = fresh_service().await;
    let b = svc
        .create_broadcast("n", "hi", &["+1".into(), "+2".into()])
        .await
        .unwrap();

    let broker = RecordingPublisher::default();
    svc.publish_pending(&broker, 100).await.unwrap();

    for msg in broker.published.lock().unwrap().iter() {
        let outcome = svc.send_message(&RejectingGateway, msg).await.unwrap();
        assert_eq!(outcome, SendOutcome::Rejected);
    }

    let (_, messages) = svc.get_broadcast(b.id).await.unwrap();
    assert!(messages.iter().all(|m| m.status == MessageStatus::Failed));
}
