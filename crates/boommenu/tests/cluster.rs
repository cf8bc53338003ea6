use boommenu::item::{ItemKind, ItemView, ViewProvider};
use boommenu::layout::{ClusterGravity, ClusterShape};
use boommenu::schedule::{EmissionOrder, Timing};
use boommenu::style::ResolvedStyle;
use boommenu::{ClusterConfig, ClusterManager, ClusterState, ItemBuilder, Rect, Size};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use strum::IntoEnumIterator;

/// Host stand-in that records every dimension pushed to its views.
#[derive(Default)]
struct RecordingHost {
    natural: Vec<Size>,
    assigned: Rc<RefCell<Vec<(usize, u32, u32)>>>,
}

struct RecordingView {
    index: usize,
    natural: Size,
    assigned: Rc<RefCell<Vec<(usize, u32, u32)>>>,
}

impl ItemView for RecordingView {
    fn measure(&self) -> Size {
        self.natural
    }

    fn update_dimension(&mut self, width: u32, height: u32) {
        self.assigned.borrow_mut().push((self.index, width, height));
    }
}

impl ViewProvider for RecordingHost {
    fn inflate(
        &mut self,
        index: usize,
        _kind: &ItemKind,
        _style: &ResolvedStyle,
    ) -> Option<Box<dyn ItemView>> {
        let natural = *self.natural.get(index)?;
        Some(Box::new(RecordingView {
            index,
            natural,
            assigned: Rc::clone(&self.assigned),
        }))
    }
}

fn builders(n: usize) -> Vec<ItemBuilder> {
    (0..n)
        .map(|i| ItemBuilder::image_only(format!("icon-{i}")))
        .collect()
}

#[test]
fn unisized_views_hear_the_final_dimension() {
    let mut host = RecordingHost {
        natural: vec![Size::new(30.0, 40.0), Size::new(50.0, 20.0), Size::new(45.0, 45.0)],
        ..Default::default()
    };
    let mut manager = ClusterManager::new(ClusterConfig {
        seed: Some(3),
        ..Default::default()
    })
    .with_items(builders(3));

    manager
        .build(
            Rect::new(500.0, 900.0, 580.0, 980.0),
            Size::new(1080.0, 1920.0),
            &mut host,
        )
        .unwrap();

    let assigned = host.assigned.borrow();
    for index in 0..3 {
        let last = assigned.iter().rev().find(|(i, _, _)| *i == index).unwrap();
        assert_eq!((last.1, last.2), (50, 45));
    }
    assert!(manager.items().iter().all(|i| (i.width, i.height) == (50, 45)));
}

#[test]
fn every_shape_and_gravity_stays_on_the_board() {
    let board = Size::new(320.0, 480.0);
    let anchors = [
        Rect::new(0.0, 0.0, 40.0, 40.0),
        Rect::new(140.0, 220.0, 180.0, 260.0),
        Rect::new(280.0, 440.0, 320.0, 480.0),
    ];

    for shape in ClusterShape::iter() {
        for gravity in ClusterGravity::iter() {
            for anchor in anchors {
                let mut manager = ClusterManager::new(ClusterConfig {
                    shape,
                    gravity,
                    seed: Some(11),
                    ..Default::default()
                })
                .with_items(builders(12));
                let mut host = RecordingHost {
                    natural: vec![Size::new(36.0, 36.0); 12],
                    ..Default::default()
                };

                let bounds = manager.build(anchor, board, &mut host).unwrap();
                assert!(bounds.left <= bounds.right && bounds.top <= bounds.bottom);
                let eps = 1e-6;
                assert!(
                    bounds.left >= -eps
                        && bounds.top >= -eps
                        && bounds.right <= board.width + eps
                        && bounds.bottom <= board.height + eps,
                    "{shape} {gravity} {anchor:?}: {bounds:?}"
                );
                for item in manager.items() {
                    let rect = item.end_rect();
                    assert!(rect.left >= bounds.left - eps && rect.right <= bounds.right + eps);
                }
            }
        }
    }
}

#[test]
fn delays_use_every_slot_once() {
    let timing = Timing {
        start_delay: Duration::from_millis(20),
        delay_between: Duration::from_millis(30),
        duration: Duration::from_millis(200),
        total: Duration::from_millis(5000),
    };

    for order in EmissionOrder::iter() {
        for n in [1, 2, 7] {
            let mut manager = ClusterManager::new(ClusterConfig {
                emission_order: order,
                timing,
                ..Default::default()
            })
            .with_items(builders(n));
            let mut host = RecordingHost {
                natural: vec![Size::new(20.0, 20.0); n],
                ..Default::default()
            };
            manager
                .build(
                    Rect::new(100.0, 900.0, 160.0, 960.0),
                    Size::new(1080.0, 1920.0),
                    &mut host,
                )
                .unwrap();

            let mut delays = manager.delays().to_vec();
            delays.sort();
            let expected: Vec<Duration> = (0..n as u32)
                .map(|k| timing.start_delay + timing.delay_between * k)
                .collect();
            assert_eq!(delays, expected, "{order} with {n} items");
        }
    }
}

#[test]
fn full_lifecycle() {
    let mut manager = ClusterManager::new(ClusterConfig {
        shape: ClusterShape::Circle,
        gravity: ClusterGravity::Center,
        seed: Some(5),
        ..Default::default()
    })
    .with_items(builders(6));
    let mut host = RecordingHost {
        natural: vec![Size::new(40.0, 40.0); 6],
        ..Default::default()
    };
    let board = Size::new(1080.0, 1920.0);
    manager
        .build(Rect::new(500.0, 900.0, 580.0, 980.0), board, &mut host)
        .unwrap();
    manager.start().unwrap();

    let mid = manager.advance(Duration::from_millis(200));
    assert!(!mid.is_empty());
    assert_eq!(manager.state(), ClusterState::Animating);

    let moved = manager.on_drag(2, 15.0, -15.0, board).unwrap();
    assert!(moved.x && moved.y);

    manager.on_click(4, 0.0, 0.0).unwrap();
    assert_eq!(manager.state(), ClusterState::Idle);
    assert_eq!(manager.drain_events().len(), 2);
}
