use image::RgbImage;
use ndarray::{Array1, Array3, ArrayView1, Axis, Ix2};

use crate::{
    MlErr, Result,
    arch::{Sequential, vgg16},
    labels::Labels,
    prediction::{Prediction, softmax, top_k},
    vision,
    weights::WeightSet,
};

/// A pretrained image classifier: a model, the weights bound to it and the names of its classes.
///
/// Every consistency check happens on construction, once built the classifier can only fail on
/// inputs of the wrong shape.
#[derive(Clone, Debug)]
pub struct Classifier {
    model: Sequential,
    weights: WeightSet,
    labels: Labels,
    input_shape: [usize; 3],
}

impl Classifier {
    /// Creates a new `Classifier`.
    ///
    /// # Arguments
    /// * `model` - The network.
    /// * `weights` - The pretrained parameters, bound positionally to the model's layers.
    /// * `labels` - One label per class the model predicts.
    /// * `input_shape` - The `[h, w, 3]` shape of a single image.
    ///
    /// # Returns
    /// A new `Classifier` or the first inconsistency found between its parts.
    pub fn new(
        model: Sequential,
        weights: WeightSet,
        labels: Labels,
        input_shape: [usize; 3],
    ) -> Result<Self> {
        if input_shape[2] != 3 {
            return Err(MlErr::ShapeMismatch {
                layer: "input".into(),
                got: input_shape.to_vec(),
                expected: "[h, w, 3]".into(),
            });
        }

        let shapes = model.output_shapes(&input_shape)?;
        let classes = match shapes.last().map(Vec::as_slice) {
            Some(&[classes]) => classes,
            other => {
                return Err(MlErr::ShapeMismatch {
                    layer: model.layers().last().map_or("output", |l| l.name()).into(),
                    got: other.unwrap_or_default().to_vec(),
                    expected: "[classes]".into(),
                });
            }
        };

        if classes != labels.len() {
            return Err(MlErr::InvalidLabels {
                got: labels.len(),
                expected: classes,
            });
        }

        model.check_weights(&weights)?;

        Ok(Self {
            model,
            weights,
            labels,
            input_shape,
        })
    }

    /// A VGG-16 classifier over 224x224 RGB images.
    pub fn vgg16(weights: WeightSet, labels: Labels) -> Result<Self> {
        Self::new(vgg16::model(), weights, labels, vgg16::INPUT_SHAPE)
    }

    pub fn model(&self) -> &Sequential {
        &self.model
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn input_shape(&self) -> [usize; 3] {
        self.input_shape
    }

    /// Resizes the image to the model's input size and subtracts the channel means.
    pub fn prepare(&self, img: &RgbImage) -> Result<Array3<f32>> {
        let [h, w, _] = self.input_shape;
        let (Ok(h), Ok(w)) = (u32::try_from(h), u32::try_from(w)) else {
            return Err(self.input_err(&self.input_shape));
        };

        Ok(vision::preprocess(img, h, w))
    }

    /// Runs a single preprocessed image through the model.
    ///
    /// # Returns
    /// The raw class scores.
    pub fn logits(&self, x: &Array3<f32>) -> Result<Array1<f32>> {
        if x.shape() != self.input_shape.as_slice() {
            return Err(self.input_err(x.shape()));
        }

        let batch = x.view().insert_axis(Axis(0)).to_owned().into_dyn();
        let y = self.model.forward(self.weights.params(), batch)?;
        let y = y.into_dimensionality::<Ix2>()?;

        Ok(y.row(0).to_owned())
    }

    /// The class probabilities of a single preprocessed image.
    pub fn probabilities(&self, x: &Array3<f32>) -> Result<Array1<f32>> {
        Ok(softmax(self.logits(x)?.view()))
    }

    /// Labels the `k` most probable classes of a probability vector.
    pub fn top(&self, probs: ArrayView1<f32>, k: usize) -> Vec<Prediction> {
        top_k(probs, k)
            .into_iter()
            .map(|(class_id, probability)| Prediction {
                class_id,
                label: self.labels.get(class_id).unwrap_or_default().to_string(),
                probability,
            })
            .collect()
    }

    /// Classifies a single preprocessed image.
    pub fn classify(&self, x: &Array3<f32>, k: usize) -> Result<Vec<Prediction>> {
        let probs = self.probabilities(x)?;
        Ok(self.top(probs.view(), k))
    }

    fn input_err(&self, got: &[usize]) -> MlErr {
        MlErr::ShapeMismatch {
            layer: "input".into(),
            got: got.to_vec(),
            expected: format!("{:?}", self.input_shape),
        }
    }
}
