#![cfg(test)]

use ndarray::{Array, ArrayD, IxDyn, array};

use super::{Conv2d, Dense, Flatten, Layer, MaxPool2d, Padding};
use crate::{MlErr, arch::activations::ActFn};

fn nhwc(shape: [usize; 4], data: Vec<f32>) -> ArrayD<f32> {
    ArrayD::from_shape_vec(IxDyn(&shape), data).unwrap()
}

fn one_to_nine() -> ArrayD<f32> {
    nhwc([1, 3, 3, 1], (1..=9).map(|v| v as f32).collect())
}

#[test]
fn test_padding_windows() {
    assert_eq!(Padding::Same.window(224, 3, 1), Some((224, 1)));
    assert_eq!(Padding::Same.window(224, 2, 2), Some((112, 0)));
    assert_eq!(Padding::Same.window(7, 2, 2), Some((4, 0)));
    assert_eq!(Padding::Same.window(5, 3, 2), Some((3, 1)));
    assert_eq!(Padding::Valid.window(5, 3, 2), Some((2, 0)));
    assert_eq!(Padding::Valid.window(2, 3, 1), None);
    assert_eq!(Padding::Same.window(0, 3, 1), None);
}

#[test]
fn test_conv_same_box_filter() {
    let conv = Conv2d::new("box", (1, 1), 3, 1, Padding::Same, None);
    let mut params = vec![1.0; 9];
    params.push(0.0);

    let y = conv.forward(&params, one_to_nine()).unwrap();

    assert_eq!(y.shape(), &[1, 3, 3, 1]);
    assert_eq!(
        y.iter().copied().collect::<Vec<_>>(),
        vec![12., 21., 16., 27., 45., 33., 24., 39., 28.]
    );
}

#[test]
fn test_conv_bias_and_relu() {
    let conv = Conv2d::new("box", (1, 1), 3, 1, Padding::Same, Some(ActFn::relu()));
    let mut params = vec![1.0; 9];
    params.push(-30.0);

    let y = conv.forward(&params, one_to_nine()).unwrap();

    assert_eq!(
        y.iter().copied().collect::<Vec<_>>(),
        vec![0., 0., 0., 0., 15., 3., 0., 9., 0.]
    );
}

#[test]
fn test_conv_weights_are_hwio() {
    // w[0][0][ci][co]: ci 0 -> (1, 2), ci 1 -> (3, 4)
    let conv = Conv2d::new("mix", (2, 2), 1, 1, Padding::Same, None);
    let params = [1.0, 2.0, 3.0, 4.0, 0.0, 0.5];

    let y = conv
        .forward(&params, nhwc([1, 1, 1, 2], vec![1.0, 10.0]))
        .unwrap();

    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![31.0, 42.5]);
}

#[test]
fn test_conv_valid_stride() {
    let conv = Conv2d::new("strided", (1, 1), 2, 2, Padding::Valid, None);
    let params = [1.0, 0.0, 0.0, 0.0, 0.0];
    let x = nhwc([1, 4, 4, 1], (0..16).map(|v| v as f32).collect());

    let y = conv.forward(&params, x).unwrap();

    assert_eq!(y.shape(), &[1, 2, 2, 1]);
    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![0., 2., 8., 10.]);
}

#[test]
fn test_conv_batches_are_independent() {
    let conv = Conv2d::new("box", (1, 1), 3, 1, Padding::Same, None);
    let mut params = vec![1.0; 9];
    params.push(0.0);

    let mut data: Vec<f32> = (1..=9).map(|v| v as f32).collect();
    data.extend(vec![0.0; 9]);
    let y = conv.forward(&params, nhwc([2, 3, 3, 1], data)).unwrap();

    assert_eq!(y.shape(), &[2, 3, 3, 1]);
    assert_eq!(y[[0, 1, 1, 0]], 45.0);
    assert!(y.index_axis(ndarray::Axis(0), 1).iter().all(|&v| v == 0.0));
}

#[test]
fn test_conv_rejects_wrong_channels() {
    let conv = Conv2d::new("conv", (3, 8), 3, 1, Padding::Same, None);
    let params = vec![0.0; conv.size()];

    let err = conv.forward(&params, one_to_nine()).unwrap_err();

    assert!(matches!(err, MlErr::ShapeMismatch { ref layer, .. } if layer == "conv"));
}

#[test]
fn test_conv_rejects_wrong_param_count() {
    let conv = Conv2d::new("conv", (1, 1), 3, 1, Padding::Same, None);

    let err = conv.forward(&[0.0; 3], one_to_nine()).unwrap_err();

    assert!(matches!(
        err,
        MlErr::SizeMismatch {
            got: 3,
            expected: 10,
            ..
        }
    ));
}

#[test]
fn test_max_pool_even() {
    let pool = MaxPool2d::new("pool", 2, 2, Padding::Same);
    let x = nhwc([1, 4, 4, 1], (0..16).map(|v| v as f32).collect());

    let y = pool.forward(x).unwrap();

    assert_eq!(y.shape(), &[1, 2, 2, 1]);
    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![5., 7., 13., 15.]);
}

#[test]
fn test_max_pool_same_odd_ignores_padding() {
    let pool = MaxPool2d::new("pool", 2, 2, Padding::Same);

    let y = pool.forward(one_to_nine()).unwrap();
    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![5., 6., 8., 9.]);

    let y = pool.forward(one_to_nine().mapv(|v| -v)).unwrap();
    assert_eq!(
        y.iter().copied().collect::<Vec<_>>(),
        vec![-1., -3., -7., -9.]
    );
}

#[test]
fn test_max_pool_keeps_channels_apart() {
    let pool = MaxPool2d::new("pool", 2, 2, Padding::Valid);
    let x = nhwc([1, 2, 2, 2], vec![1., -1., 2., -2., 3., -3., 4., -4.]);

    let y = pool.forward(x).unwrap();

    assert_eq!(y.shape(), &[1, 1, 1, 2]);
    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![4., -1.]);
}

#[test]
fn test_flatten_keeps_row_major_order() {
    let flatten = Flatten::new("flatten");
    let x = nhwc([1, 2, 2, 2], (0..8).map(|v| v as f32).collect());

    let y = flatten.forward(x).unwrap();

    assert_eq!(y.shape(), &[1, 8]);
    assert_eq!(
        y.iter().copied().collect::<Vec<_>>(),
        (0..8).map(|v| v as f32).collect::<Vec<_>>()
    );
}

#[test]
fn test_flatten_transposed_input() {
    let flatten = Flatten::new("flatten");
    let x = Array::from_shape_vec((1, 2, 2, 1), vec![1., 2., 3., 4.])
        .unwrap()
        .permuted_axes([0, 2, 1, 3])
        .into_dyn();

    let y = flatten.forward(x).unwrap();

    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![1., 3., 2., 4.]);
}

#[test]
fn test_dense_golden() {
    let params = [1.0, 0.0, -1.0, 2.0, 1.0, 0.0, 0.5, -10.0, 0.0];
    let x = array![[1.0_f32, 2.0]].into_dyn();

    let linear = Dense::new("linear", (2, 3), None);
    let y = linear.forward(&params, x.clone()).unwrap();
    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![5.5, -8.0, -1.0]);

    let relu = Dense::new("relu", (2, 3), Some(ActFn::relu()));
    let y = relu.forward(&params, x).unwrap();
    assert_eq!(y.iter().copied().collect::<Vec<_>>(), vec![5.5, 0.0, 0.0]);
}

#[test]
fn test_dense_rejects_wrong_features() {
    let dense = Dense::new("fc", (3, 1), None);
    let params = vec![0.0; dense.size()];

    let err = dense
        .forward(&params, array![[1.0_f32, 2.0]].into_dyn())
        .unwrap_err();

    assert!(matches!(err, MlErr::ShapeMismatch { .. }));
}

#[test]
fn test_layer_sizes_and_param_shapes() {
    let conv = Layer::conv("conv1_1", (3, 64), 3, Some(ActFn::relu()));
    assert_eq!(conv.size(), 3 * 3 * 3 * 64 + 64);
    assert_eq!(conv.param_shapes(), vec![vec![3, 3, 3, 64], vec![64]]);

    let dense = Layer::dense("fc", (25088, 4096), None);
    assert_eq!(dense.size(), 25088 * 4096 + 4096);
    assert_eq!(dense.param_shapes(), vec![vec![25088, 4096], vec![4096]]);

    assert_eq!(Layer::max_pool("pool1", 2, 2).size(), 0);
    assert!(Layer::flatten("flatten").param_shapes().is_empty());
    assert_eq!(conv.to_string(), "conv1_1 (conv)");
}
