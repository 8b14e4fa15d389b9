use beamdelta::{BeamDeltaError, ImageView, OwnedImage};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        BeamDeltaError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        BeamDeltaError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
    assert!(err.is_invalid_input());
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u16; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        BeamDeltaError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0.0f32; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, BeamDeltaError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.shape(), (4, 4));

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert_eq!(roi.get(0, 0).copied(), Some(5u8));
    assert!(roi.get(2, 0).is_none());

    assert!(view.roi(3, 3, 2, 2).is_err());
}

#[test]
fn owned_image_copies_strided_views() {
    // 3x2 image padded to a stride of 4.
    let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
    let view = ImageView::new(&data, 3, 2, 4).unwrap();

    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.data(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(owned.shape(), (2, 3));
    assert_eq!(owned.view().row(1).unwrap(), &[4, 5, 6]);
}

#[test]
fn owned_image_requires_exact_length() {
    let err = OwnedImage::new(vec![0u8; 5], 2, 2).err().unwrap();
    assert!(err.is_invalid_input());

    let err = OwnedImage::new(vec![0u8; 3], 2, 2).err().unwrap();
    assert_eq!(err, BeamDeltaError::BufferTooSmall { needed: 4, got: 3 });
}
