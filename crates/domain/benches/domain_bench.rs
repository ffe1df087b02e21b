use criterion::{Criterion, criterion_group, criterion_main};
use domain::{AggregateRoot, Customer, CustomerEvent, RecordedEvent, RegisterCustomer};

fn history(renames: usize) -> Vec<RecordedEvent<CustomerEvent>> {
    let mut root = Customer::register(&RegisterCustomer::new("Ada", "ada@example.com")).unwrap();
    for i in 0..renames {
        let name = format!("Ada {i}");
        root.execute(None, |c| c.rename(&name)).unwrap();
    }
    root.take_pending_events()
}

fn bench_replay(c: &mut Criterion) {
    let events = history(500);

    c.bench_function("domain/replay_500", |b| {
        b.iter(|| AggregateRoot::<Customer>::replay(events.clone()).unwrap());
    });
}

fn bench_execute(c: &mut Criterion) {
    let mut root = Customer::register(&RegisterCustomer::new("Ada", "ada@example.com")).unwrap();
    let mut i = 0u64;

    c.bench_function("domain/execute_rename", |b| {
        b.iter(|| {
            i += 1;
            let name = format!("Ada {i}");
            root.execute(None, |c| c.rename(&name)).unwrap();
            root.mark_committed();
        });
    });
}

fn bench_no_op(c: &mut Criterion) {
    let mut root = Customer::register(&RegisterCustomer::new("Ada", "ada@example.com")).unwrap();

    c.bench_function("domain/execute_no_op", |b| {
        b.iter(|| root.execute(None, |c| c.rename("Ada")).unwrap());
    });
}

criterion_group!(benches, bench_replay, bench_execute, bench_no_op);
criterion_main!(benches);
