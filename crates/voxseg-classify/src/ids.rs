//! Object id list
//!
//! The ordered list of class ids being segmented, with one PDF weight per
//! id. List order is the class index used everywhere else: probability
//! images, samples and the processing order of the regularizer.

use crate::error::{ClassifyError, ClassifyResult};
use voxseg_core::LabelValue;

/// Default weight of a newly added class
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Ordered object ids with parallel PDF weights
///
/// The two lists always have the same length. Ids are distinct and never
/// equal to the void label.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectIdList<L> {
    ids: Vec<L>,
    weights: Vec<f64>,
}

impl<L: LabelValue> Default for ObjectIdList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LabelValue> ObjectIdList<L> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Create a list from ids, all with the default weight
    pub fn from_ids(ids: Vec<L>) -> ClassifyResult<Self> {
        Self::check_ids(&ids)?;
        let weights = vec![DEFAULT_WEIGHT; ids.len()];
        Ok(Self { ids, weights })
    }

    fn check_id(id: L) -> ClassifyResult<()> {
        if id.is_void() {
            return Err(ClassifyError::VoidObjectId(id.to_string()));
        }
        Ok(())
    }

    fn check_ids(ids: &[L]) -> ClassifyResult<()> {
        for (i, &id) in ids.iter().enumerate() {
            Self::check_id(id)?;
            if ids[..i].contains(&id) {
                return Err(ClassifyError::DuplicateObjectId(id.to_string()));
            }
        }
        Ok(())
    }

    fn check_weight(weight: f64) -> ClassifyResult<()> {
        if !weight.is_finite() {
            return Err(ClassifyError::InvalidParameter(format!(
                "PDF weight must be finite, got {weight}"
            )));
        }
        Ok(())
    }

    /// Replace the list with a single id
    pub fn set_single(&mut self, id: L) -> ClassifyResult<()> {
        Self::check_id(id)?;
        self.ids = vec![id];
        self.weights = vec![DEFAULT_WEIGHT];
        Ok(())
    }

    /// Append an id with the default weight
    pub fn push(&mut self, id: L) -> ClassifyResult<()> {
        Self::check_id(id)?;
        if self.ids.contains(&id) {
            return Err(ClassifyError::DuplicateObjectId(id.to_string()));
        }
        self.ids.push(id);
        self.weights.push(DEFAULT_WEIGHT);
        Ok(())
    }

    /// Replace all ids; weights reset to the default
    pub fn set_ids(&mut self, ids: Vec<L>) -> ClassifyResult<()> {
        *self = Self::from_ids(ids)?;
        Ok(())
    }

    /// Remove every id and weight
    pub fn clear(&mut self) {
        self.ids.clear();
        self.weights.clear();
    }

    /// Set the weight of class `index`
    pub fn set_weight(&mut self, index: usize, weight: f64) -> ClassifyResult<()> {
        let count = self.len();
        Self::check_weight(weight)?;
        let slot = self
            .weights
            .get_mut(index)
            .ok_or(ClassifyError::ClassIndexOutOfRange { index, count })?;
        *slot = weight;
        Ok(())
    }

    /// Replace all weights; the count must match the number of ids
    pub fn set_weights(&mut self, weights: Vec<f64>) -> ClassifyResult<()> {
        if weights.len() != self.ids.len() {
            return Err(ClassifyError::WeightCountMismatch {
                ids: self.ids.len(),
                weights: weights.len(),
            });
        }
        for &w in &weights {
            Self::check_weight(w)?;
        }
        self.weights = weights;
        Ok(())
    }

    /// Object ids in class order
    pub fn ids(&self) -> &[L] {
        &self.ids
    }

    /// Weights in class order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Id of class `index`
    pub fn id(&self, index: usize) -> Option<L> {
        self.ids.get(index).copied()
    }

    /// Weight of class `index`
    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `label` is one of the object ids
    pub fn contains(&self, label: L) -> bool {
        self.ids.contains(&label)
    }

    /// Class index of `id`, if present
    pub fn index_of(&self, id: L) -> Option<usize> {
        self.ids.iter().position(|&x| x == id)
    }

    /// Class index of `id`
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::ObjectIdNotFound` if `id` is not in the list.
    pub fn require_index(&self, id: L) -> ClassifyResult<usize> {
        self.index_of(id)
            .ok_or_else(|| ClassifyError::ObjectIdNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_lookup() {
        let mut list = ObjectIdList::<u8>::new();
        list.push(7).unwrap();
        list.push(3).unwrap();
        assert_eq!(list.ids(), &[7, 3]);
        assert_eq!(list.weights(), &[1.0, 1.0]);
        assert_eq!(list.index_of(3), Some(1));
        assert_eq!(list.index_of(9), None);
        assert!(matches!(
            list.require_index(9),
            Err(ClassifyError::ObjectIdNotFound(s)) if s == "9"
        ));
    }

    #[test]
    fn test_rejects_void_and_duplicates() {
        let mut list = ObjectIdList::<u8>::new();
        assert!(matches!(list.push(255), Err(ClassifyError::VoidObjectId(_))));
        list.push(1).unwrap();
        assert!(matches!(list.push(1), Err(ClassifyError::DuplicateObjectId(_))));
        assert!(ObjectIdList::<u8>::from_ids(vec![1, 2, 1]).is_err());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_set_ids_resets_weights() {
        let mut list = ObjectIdList::<u16>::from_ids(vec![1, 2]).unwrap();
        list.set_weight(1, 0.5).unwrap();
        list.set_ids(vec![4, 5, 6]).unwrap();
        assert_eq!(list.weights(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_failed_set_ids_keeps_list() {
        let mut list = ObjectIdList::<u8>::from_ids(vec![1, 2]).unwrap();
        assert!(list.set_ids(vec![3, 3]).is_err());
        assert_eq!(list.ids(), &[1, 2]);
    }

    #[test]
    fn test_weights() {
        let mut list = ObjectIdList::<u8>::from_ids(vec![1, 2]).unwrap();
        assert!(matches!(
            list.set_weights(vec![1.0]),
            Err(ClassifyError::WeightCountMismatch { ids: 2, weights: 1 })
        ));
        assert!(matches!(
            list.set_weight(2, 1.0),
            Err(ClassifyError::ClassIndexOutOfRange { index: 2, count: 2 })
        ));
        assert!(list.set_weight(0, f64::NAN).is_err());
        list.set_weights(vec![2.0, 0.5]).unwrap();
        assert_eq!(list.weight(1), Some(0.5));
    }

    #[test]
    fn test_set_single_and_clear() {
        let mut list = ObjectIdList::<u8>::from_ids(vec![1, 2]).unwrap();
        list.set_single(9).unwrap();
        assert_eq!(list.ids(), &[9]);
        list.clear();
        assert!(list.is_empty());
        assert!(list.weights().is_empty());
    }
}
