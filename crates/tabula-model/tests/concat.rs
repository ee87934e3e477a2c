use pretty_assertions::assert_eq;
use tabula_model::{
    BasicFormat, CellScalar, ColumnDefinition, ConcatStrategy, Matrix, MatrixError, RowDefinition,
    RowValue,
};

fn basic(font_size: u16) -> BasicFormat {
    BasicFormat {
        font_size: Some(font_size),
        ..Default::default()
    }
}

fn font_size_at(def: &RowDefinition, col_index: usize) -> Option<u16> {
    def.format_for_col(col_index)?
        .as_any()
        .downcast_ref::<BasicFormat>()?
        .font_size
}

#[test]
fn concat_x_adds_width_and_keeps_the_tallest_height() {
    let m1 = Matrix::with().key("left", 0).dimensions(2, 4).build().unwrap();
    let m2 = Matrix::with().key("right", 0).dimensions(3, 3).build().unwrap();

    let m3 = m1.concat_x(m2, ConcatStrategy::default()).unwrap();
    assert_eq!(m3.count_of_rows(), 3);
    assert_eq!(m3.count_of_columns(), 7);
}

#[test]
fn concat_y_adds_height_and_keeps_the_widest_width() {
    let m1 = Matrix::with().key("left", 0).dimensions(2, 4).build().unwrap();
    let m2 = Matrix::with().key("right", 0).dimensions(3, 3).build().unwrap();

    let m3 = m1.concat_y(m2).unwrap();
    assert_eq!(m3.count_of_rows(), 5);
    assert_eq!(m3.count_of_columns(), 4);
}

#[test]
fn concat_with_same_key_fails_in_both_directions() {
    let build = || Matrix::with().key("dup", 7).dimensions(1, 1).build().unwrap();

    let err = build().concat_x(build(), ConcatStrategy::default()).unwrap_err();
    assert!(matches!(err, MatrixError::SameKeyConcat(ref key) if key.name == "dup"));

    let err = build().concat_y(build()).unwrap_err();
    assert!(matches!(err, MatrixError::SameKeyConcat(ref key) if key.name == "dup"));
}

#[test]
fn concat_x_carries_right_columns_with_shifted_indices() {
    let left_cols: Vec<ColumnDefinition> =
        (1..=3).map(|i| ColumnDefinition::new(format!("Col{i}"))).collect();
    let right_cols: Vec<ColumnDefinition> =
        (1..=4).map(|i| ColumnDefinition::new(format!("Col{i}"))).collect();

    let m1 = Matrix::with().key("left", 0).cols(left_cols).rows_count(2).build().unwrap();
    let m2 = Matrix::with().key("right", 0).cols(right_cols).rows_count(3).build().unwrap();

    let m3 = m1.concat_x(m2, ConcatStrategy::default()).unwrap();
    assert_eq!(m3.count_of_rows(), 3);
    assert_eq!(m3.count_of_columns(), 7);

    let indices: Vec<usize> = m3
        .columns_definitions()
        .iter()
        .map(|col| col.index.unwrap())
        .collect();
    assert_eq!(indices, [0, 1, 2, 3, 4, 5, 6]);

    // Right-hand columns keep their original key scope with the new index.
    let carried = m3.column_by_index(3).unwrap();
    assert_eq!(carried.name, "Col1");
    let key = carried.key.as_ref().unwrap();
    assert_eq!(key.matrix_key.name, "right");
    assert_eq!(key.index, 3);
}

#[test]
fn concat_x_joins_row_values_positionally() {
    let left_values: Vec<RowValue> = (1..=3)
        .map(|line| {
            (1..=4).fold(RowValue::new(), |row, col| {
                row.set(format!("ACol{col}"), format!("AValue{col}{line}"))
            })
        })
        .collect();
    let right_values: Vec<RowValue> = (1..=3)
        .map(|line| {
            (1..=3).fold(RowValue::new(), |row, col| {
                row.set(format!("BCol{col}"), format!("BValue{col}{line}"))
            })
        })
        .collect();

    let m1 = Matrix::with().key("left", 0).row_values(left_values).build().unwrap();
    let m2 = Matrix::with().key("right", 0).row_values(right_values).build().unwrap();

    let m3 = m1.concat_x(m2, ConcatStrategy::default()).unwrap();
    assert_eq!(m3.count_of_rows(), 3);
    assert_eq!(m3.count_of_columns(), 7);

    let first = &m3.row_values()[0];
    assert_eq!(first.cells().len(), 7);
    assert_eq!(
        first.value_by_index(0),
        Some(&CellScalar::Text("AValue11".into()))
    );
    assert_eq!(
        first.value_by_index(4),
        Some(&CellScalar::Text("BValue11".into()))
    );

    // Carried cells are re-addressed: shifted column, left row index.
    let carried = &first.cells()[4];
    assert_eq!(carried.col_index(), 4);
    assert_eq!(carried.row_index(), 1);
    assert_eq!(carried.address(), "E2");
    assert_eq!(carried.matrix_key().name, "right");
}

#[test]
fn concat_x_appends_surplus_right_rows_shifted() {
    let m1 = Matrix::with()
        .key("left", 0)
        .row_values(vec![RowValue::new().set("ACol1", 1).set("ACol2", 2)])
        .build()
        .unwrap();
    let m2 = Matrix::with()
        .key("right", 0)
        .row_values(vec![
            RowValue::new().set("BCol1", 10),
            RowValue::new().set("BCol1", 20),
            RowValue::new().set("BCol1", 30),
        ])
        .build()
        .unwrap();

    let m3 = m1.concat_x(m2, ConcatStrategy::default()).unwrap();
    assert_eq!(m3.count_of_rows(), 3);
    assert_eq!(m3.count_of_columns(), 3);

    let surplus = &m3.row_values()[1];
    assert_eq!(surplus.value_by_index(2), Some(&CellScalar::Number(20.0)));
    assert_eq!(surplus.cells().len(), 3, "surplus rows are densified");

    let carried = surplus
        .cells()
        .iter()
        .find(|cell| cell.col_index() == 2)
        .unwrap();
    assert_eq!(carried.address(), "C3");
    assert!(surplus.cells()[0].value().is_empty());
}

#[test]
fn keep_left_folds_right_formats_for_new_columns_only() {
    let m1 = Matrix::with()
        .key("left", 0)
        .cols(vec![ColumnDefinition::new("L1"), ColumnDefinition::new("L2")])
        .rows(vec![RowDefinition::new("R").with_format("L1", basic(10))])
        .rows_count(1)
        .build()
        .unwrap();
    let m2 = Matrix::with()
        .key("right", 0)
        .cols(vec![ColumnDefinition::new("R1")])
        .rows(vec![
            RowDefinition::new("R").with_format("R1", basic(99)),
            RowDefinition::new("S").with_format("R1", basic(42)),
        ])
        .rows_count(2)
        .build()
        .unwrap();

    let m3 = m1.concat_x(m2, ConcatStrategy::KeepLeft).unwrap();

    // The colliding key keeps the left definition's own formats and picks up
    // the right definition's format at the shifted index.
    let merged = m3.row_definition(Some("R"));
    assert_eq!(font_size_at(&merged, 0), Some(10));
    assert_eq!(font_size_at(&merged, 2), Some(99));

    // The non-colliding right definition is appended, shifted.
    let appended = m3.row_definition(Some("S"));
    assert_eq!(font_size_at(&appended, 2), Some(42));
    assert_eq!(font_size_at(&appended, 0), None);
}

#[test]
fn raise_error_strategy_fails_on_row_key_collision() {
    let build_with_def = |name: &str, key: &str| {
        Matrix::with()
            .key(name, 0)
            .cols_count(1)
            .rows_count(1)
            .rows(vec![RowDefinition::new(key)])
            .build()
            .unwrap()
    };

    let err = build_with_def("left", "R")
        .concat_x(build_with_def("right", "R"), ConcatStrategy::RaiseError)
        .unwrap_err();
    assert_eq!(err, MatrixError::RowKeyCollision("R".into()));

    // Disjoint keys pass and both definitions survive.
    let ok = build_with_def("left", "A")
        .concat_x(build_with_def("right", "B"), ConcatStrategy::RaiseError)
        .unwrap();
    assert_eq!(ok.rows_definitions().len(), 2);
}

#[test]
fn unimplemented_strategies_fail_instead_of_guessing() {
    let build = |name: &str| Matrix::with().key(name, 0).dimensions(1, 1).build().unwrap();

    for strategy in [ConcatStrategy::KeepRight, ConcatStrategy::Merge] {
        let err = build("left").concat_x(build("right"), strategy).unwrap_err();
        assert_eq!(err, MatrixError::UnimplementedStrategy(strategy));
    }
}
