//! Optional CBOR-friendly serialization for [`Bars`], gated behind the
//! `serde` feature.
//!
//! [`Bars`] is generic over the column representation, so there is no single
//! concrete layout to derive `Serialize`/`Deserialize` for. Instead, mirroring
//! `utils/file_format.rs`'s `RVDFileFormat`/`serialize_algo` split, every
//! representative is cloned down to a [`VecColumn`] on the way out
//! (`clone_to_veccolumn`), and [`BarsFileFormat`] is the one concrete shape
//! that gets derived `Deserialize` and read back.

use serde::{ser::SerializeStruct, Deserialize, Serialize};

use crate::bars::Bars;
use crate::columns::{Column, VecColumn};

/// A [`Bars`] flattened to a column-representation-agnostic wire format:
/// every representative becomes a [`VecColumn`], regardless of which
/// [`Column`] implementation produced it.
///
/// Deserialize into this type; serialize `&Bars<C>` directly (it implements
/// [`Serialize`] for any `C: Column`).
#[derive(Deserialize, PartialEq, Debug)]
pub struct BarsFileFormat {
    birth: Vec<Option<usize>>,
    death: Vec<Option<usize>>,
    representatives: Vec<VecColumn>,
}

impl BarsFileFormat {
    pub fn len(&self) -> usize {
        self.birth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.birth.is_empty()
    }

    pub fn birth(&self, slot: usize) -> Option<usize> {
        self.birth[slot]
    }

    pub fn death(&self, slot: usize) -> Option<usize> {
        self.death[slot]
    }

    pub fn representative(&self, slot: usize) -> &VecColumn {
        &self.representatives[slot]
    }
}

fn clone_to_veccolumn<C: Column>(col: &C) -> VecColumn {
    let mut output = VecColumn::new_with_dimension(col.dimension());
    output.add_entries(col.entries());
    output
}

impl<C: Column> Serialize for Bars<C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let n = self.len();
        let mut bff = serializer.serialize_struct("BarsFileFormat", 3)?;
        let birth: Vec<Option<usize>> = (0..n).map(|slot| self.birth(slot)).collect();
        let death: Vec<Option<usize>> = (0..n).map(|slot| self.death(slot)).collect();
        let representatives: Vec<VecColumn> =
            (0..n).map(|slot| clone_to_veccolumn(self.representative(slot))).collect();
        bff.serialize_field("birth", &birth)?;
        bff.serialize_field("death", &death)?;
        bff.serialize_field("representatives", &representatives)?;
        bff.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::VecColumn;
    use crate::matrix::Matrix;
    use crate::reduce::reduce_twist;
    use ciborium::{de::from_reader, ser::into_writer};

    fn identity_witness(n: usize, dims: &[usize]) -> Matrix<VecColumn> {
        Matrix::new(
            (0..n)
                .map(|i| VecColumn::from((dims[i], vec![i])))
                .collect(),
        )
    }

    #[test]
    fn bars_round_trip_through_cbor() {
        // vertices 0,1,2; edges 3(01),4(02),5(12); face 6
        let dims = vec![0, 0, 0, 1, 1, 1, 2];
        let mut m = Matrix::new(
            vec![
                (0, vec![]),
                (0, vec![]),
                (0, vec![]),
                (1, vec![0, 1]),
                (1, vec![0, 2]),
                (1, vec![1, 2]),
                (2, vec![3, 4, 5]),
            ]
            .into_iter()
            .map(VecColumn::from)
            .collect(),
        );
        let mut witness = identity_witness(7, &dims);
        reduce_twist(&mut m, &mut witness);
        let bars = crate::bars::extract_bars(m, witness);

        let mut bytes: Vec<u8> = vec![];
        into_writer(&bars, &mut bytes).ok();
        let decoded: BarsFileFormat = from_reader(bytes.as_slice()).unwrap();

        assert_eq!(decoded.len(), bars.len());
        for slot in 0..bars.len() {
            assert_eq!(decoded.birth(slot), bars.birth(slot));
            assert_eq!(decoded.death(slot), bars.death(slot));
            assert_eq!(
                decoded.representative(slot).entries().collect::<Vec<_>>(),
                bars.representative(slot).entries().collect::<Vec<_>>()
            );
        }
    }
}
