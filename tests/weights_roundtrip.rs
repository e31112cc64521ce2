use tabmlp::{Activation, Error, Inputs, NetworkBuilder};

const SIZES: [usize; 3] = [4, 6, 2];
const ACTS: [Activation; 2] = [Activation::ReLU, Activation::Sigmoid];

#[test]
fn file_round_trip_reproduces_every_parameter_bit_for_bit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.weights");

    let trained = NetworkBuilder::from_sizes(&SIZES, &ACTS)
        .unwrap()
        .build_with_seed(21)
        .unwrap();
    trained.save_weights(&path).unwrap();

    let mut loaded = NetworkBuilder::from_sizes(&SIZES, &ACTS)
        .unwrap()
        .build_zeroed()
        .unwrap();
    loaded.load_weights(&path).unwrap();

    for l in 0..trained.num_layers() {
        let a = trained.layer(l).unwrap();
        let b = loaded.layer(l).unwrap();
        assert_eq!(a.weights(), b.weights(), "layer {l} weights");
        assert_eq!(a.biases(), b.biases(), "layer {l} biases");
    }
}

#[test]
fn loaded_network_predicts_identically_to_the_trained_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.weights");

    let trained = NetworkBuilder::from_sizes(&SIZES, &ACTS)
        .unwrap()
        .build_with_seed(33)
        .unwrap();
    trained.save_weights(&path).unwrap();

    let mut loaded = NetworkBuilder::from_sizes(&SIZES, &ACTS)
        .unwrap()
        .build_zeroed()
        .unwrap();
    loaded.load_weights(&path).unwrap();

    let inputs = Inputs::from_rows(&[
        vec![0.1, 0.2, 0.3, 0.4],
        vec![-1.0, 2.0, -3.0, 4.0],
    ])
    .unwrap();

    assert_eq!(
        trained.predict(&inputs).unwrap(),
        loaded.predict(&inputs).unwrap()
    );
}

#[test]
fn shape_drift_in_any_dimension_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.weights");

    let trained = NetworkBuilder::from_sizes(&SIZES, &ACTS)
        .unwrap()
        .build_with_seed(0)
        .unwrap();
    trained.save_weights(&path).unwrap();

    // Hidden width drifted.
    let mut wrong_width = NetworkBuilder::from_sizes(&[4, 7, 2], &ACTS)
        .unwrap()
        .build_zeroed()
        .unwrap();
    assert!(matches!(
        wrong_width.load_weights(&path).unwrap_err(),
        Error::WeightMismatch(_)
    ));

    // Layer count drifted.
    let mut wrong_depth = NetworkBuilder::from_sizes(
        &[4, 6, 6, 2],
        &[Activation::ReLU, Activation::ReLU, Activation::Sigmoid],
    )
    .unwrap()
    .build_zeroed()
    .unwrap();
    assert!(matches!(
        wrong_depth.load_weights(&path).unwrap_err(),
        Error::WeightMismatch(_)
    ));
}

#[test]
fn missing_file_surfaces_as_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.weights");

    let mut net = NetworkBuilder::from_sizes(&SIZES, &ACTS)
        .unwrap()
        .build_zeroed()
        .unwrap();
    assert!(matches!(
        net.load_weights(&path).unwrap_err(),
        Error::Io(_)
    ));
}
