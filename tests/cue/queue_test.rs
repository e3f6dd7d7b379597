//! Integration tests for the cue queue.

use errwarn::cue::{cue_queue, Cue, QueueError};
use errwarn::sound::SoundSlot;

fn slot_for(i: usize) -> SoundSlot {
    SoundSlot::ALL[i % SoundSlot::ALL.len()]
}

#[tokio::test]
async fn cues_arrive_in_enqueue_order() {
    let (mut queue, mut rx) = cue_queue(4);

    let producer = tokio::spawn(async move {
        for i in 0..50 {
            queue.enqueue(Cue::new(slot_for(i), None)).await.unwrap();
        }
        queue.close();
        queue.enqueued()
    });

    let mut received = Vec::new();
    while let Some(cue) = rx.next().await {
        received.push(cue.slot());
    }

    assert_eq!(producer.await.unwrap(), 50);
    let expected: Vec<_> = (0..50).map(slot_for).collect();
    assert_eq!(received, expected);
}

#[tokio::test]
async fn close_is_idempotent() {
    let (mut queue, mut rx) = cue_queue(4);
    queue.enqueue(Cue::new(SoundSlot::Start, None)).await.unwrap();

    assert!(queue.close());
    assert!(!queue.close());
    assert_eq!(
        queue.enqueue(Cue::new(SoundSlot::Finish, None)).await,
        Err(QueueError::Closed)
    );

    // Cues accepted before closing are still delivered.
    assert_eq!(rx.next().await.map(|c| c.slot()), Some(SoundSlot::Start));
    assert!(rx.next().await.is_none());
}

#[tokio::test]
async fn full_queue_waits_for_consumer() {
    let (mut queue, mut rx) = cue_queue(1);
    queue.enqueue(Cue::new(SoundSlot::Start, None)).await.unwrap();

    let blocked = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        queue.enqueue(Cue::new(SoundSlot::Error, None)),
    )
    .await;
    assert!(blocked.is_err(), "enqueue should wait while the queue is full");

    assert_eq!(rx.next().await.map(|c| c.slot()), Some(SoundSlot::Start));
    queue.enqueue(Cue::new(SoundSlot::Error, None)).await.unwrap();
    assert_eq!(rx.next().await.map(|c| c.slot()), Some(SoundSlot::Error));
}
