use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use tabmlp::{Activation, Dataset, FitConfig, Loss, NetworkBuilder, Shuffle};

struct CountingAlloc {
    allocs: AtomicUsize,
    reallocs: AtomicUsize,
}

impl CountingAlloc {
    const fn new() -> Self {
        Self {
            allocs: AtomicUsize::new(0),
            reallocs: AtomicUsize::new(0),
        }
    }

    fn reset(&self) {
        self.allocs.store(0, Ordering::Relaxed);
        self.reallocs.store(0, Ordering::Relaxed);
    }

    fn alloc_events(&self) -> usize {
        self.allocs.load(Ordering::Relaxed) + self.reallocs.load(Ordering::Relaxed)
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        self.reallocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc::new();

fn make_dataset(len: usize, input_dim: usize, target_dim: usize) -> Dataset {
    let inputs = vec![0.1_f64; len * input_dim];
    let targets = vec![0.0_f64; len * target_dim];
    Dataset::from_flat(inputs, targets, input_dim, target_dim).unwrap()
}

#[test]
fn fit_does_not_allocate_per_step_for_batched_training() {
    if cfg!(feature = "matrixmultiply") {
        // The `matrixmultiply` backend may allocate internal scratch buffers.
        // This test focuses on the crate's own training loop behavior.
        return;
    }

    let input_dim = 16;
    let hidden = 32;
    let output_dim = 4;
    let batch_size = 8;

    let base = NetworkBuilder::new(input_dim)
        .unwrap()
        .add_layer(hidden, Activation::Tanh)
        .unwrap()
        .add_layer(output_dim, Activation::Linear)
        .unwrap()
        .build_with_seed(0)
        .unwrap();

    let train_small = make_dataset(batch_size, input_dim, output_dim);
    let train_large = make_dataset(batch_size * 64, input_dim, output_dim);

    let cfg = FitConfig {
        epochs: 1,
        batch_size,
        lr: 1e-3,
        shuffle: Shuffle::None,
        loss: Loss::Square,
    };

    let mut net_small = base.clone();
    ALLOC.reset();
    net_small.fit(&train_small, cfg).unwrap();
    let alloc_small = ALLOC.alloc_events();

    let mut net_large = base;
    ALLOC.reset();
    net_large.fit(&train_large, cfg).unwrap();
    let alloc_large = ALLOC.alloc_events();

    assert_eq!(
        alloc_small, alloc_large,
        "expected allocation event count to be independent of step count"
    );
}
