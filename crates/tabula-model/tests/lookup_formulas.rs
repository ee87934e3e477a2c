use pretty_assertions::assert_eq;
use tabula_model::{
    join_addresses, CellScalar, ColumnDefinition, DataType, Matrix, MatrixCell, ResolvedCell,
    RowValue,
};

fn number_col(name: &str, label: &str) -> ColumnDefinition {
    ColumnDefinition::new(name)
        .with_label(label)
        .with_data_type(DataType::Number)
}

/// Three score columns per player, a derived Total/Mean pair on every data
/// row, and a trailing total row whose formulas are built from sibling cell
/// addresses.
fn players_grid() -> Matrix {
    Matrix::with()
        .key("players", 1)
        .columns()
        .col(ColumnDefinition::new("player").with_label("Player name"))
        .col(number_col("score1", "Score 1"))
        .col(number_col("score2", "Score 2"))
        .col(number_col("score3", "Score 3"))
        .col(number_col("total", "Total"))
        .col(number_col("mean", "Mean"))
        .col(ColumnDefinition::new("note"))
        .rows()
        .row()
        .value_map("total", |mat, cell| {
            let row = mat.row(cell);
            let score = |name: &str| {
                row.col(name)
                    .and_then(|c| c.value().as_number())
                    .unwrap_or(0.0)
            };
            (score("score1") + score("score2") + score("score3")).into()
        })
        .value_map("mean", |mat, cell| {
            let row = mat.row(cell);
            let score = |name: &str| row.col(name).unwrap().value().clone();
            format!(
                "=AVERAGE({},{},{})",
                score("score1"),
                score("score2"),
                score("score3")
            )
            .into()
        })
        .keyed_row("TOTALS")
        .value_map("player", |_, _| "TOTAL".into())
        .value_map("score1", |mat, cell| {
            mat.col(cell)
                .values()
                .iter()
                .filter_map(|value| value.as_number())
                .sum::<f64>()
                .into()
        })
        .value_map("score2", |mat, cell| sum_of_column_above(mat, cell))
        .value_map("score3", |mat, cell| {
            let col = mat.col(cell);
            let cells = col.cells();
            let above = &cells[..cells.len() - 1];
            format!("={}", join_addresses(above.iter().copied(), "+")).into()
        })
        .value_map("total", |mat, cell| sum_of_column_above(mat, cell))
        .value_map("mean", |mat, cell| {
            let col = mat.col(cell);
            let first = col.first().unwrap().address().to_string();
            let above = mat.row_above(cell).unwrap();
            format!("=AVERAGE({}:{})", first, above.col("mean").unwrap().address()).into()
        })
        .row_values(vec![
            RowValue::new()
                .set("player", "Mario")
                .set("score1", 10)
                .set("score2", 20)
                .set("score3", 30),
            RowValue::new()
                .set("player", "Luigi")
                .set("score1", 12)
                .set("score2", 23)
                .set("score3", 34),
            RowValue::keyed("TOTALS"),
        ])
        .build()
        .unwrap()
}

/// `=SUM(first cell of the column : cell of the row above)`.
fn sum_of_column_above(mat: &Matrix, cell: &MatrixCell) -> CellScalar {
    let col = mat.col(cell);
    let first = col.first().unwrap().address().to_string();
    let above = mat.row_above(cell).unwrap();
    let name = cell.col_name().unwrap();
    format!("=SUM({}:{})", first, above.col(name).unwrap().address()).into()
}

fn cell_at<'a>(mat: &'a Matrix, value_pos: usize, col: usize) -> &'a MatrixCell {
    &mat.row_values()[value_pos].cells()[col]
}

#[test]
fn derived_literals_read_sibling_cells() {
    let mat = players_grid();

    let total = mat.resolve(cell_at(&mat, 0, 4));
    assert_eq!(total, ResolvedCell::Literal(CellScalar::Number(60.0)));

    let grand_total = mat.resolve(cell_at(&mat, 2, 1));
    assert_eq!(grand_total, ResolvedCell::Literal(CellScalar::Number(22.0)));
}

#[test]
fn formulas_are_built_from_literal_values() {
    let mat = players_grid();

    match mat.resolve(cell_at(&mat, 0, 5)) {
        ResolvedCell::Formula(formula) => {
            assert_eq!(formula.raw(), "=AVERAGE(10,20,30)");
            assert_eq!(formula.body(), "AVERAGE(10,20,30)");
        }
        other => panic!("expected a formula, got {other:?}"),
    }
}

#[test]
fn formulas_are_built_from_sibling_addresses() {
    let mat = players_grid();

    // Data rows sit at sheet rows 2..3; the totals row is row 4.
    match mat.resolve(cell_at(&mat, 2, 2)) {
        ResolvedCell::Formula(formula) => assert_eq!(formula.raw(), "=SUM(C2:C3)"),
        other => panic!("expected a formula, got {other:?}"),
    }
    match mat.resolve(cell_at(&mat, 2, 3)) {
        ResolvedCell::Formula(formula) => assert_eq!(formula.raw(), "=D2+D3"),
        other => panic!("expected a formula, got {other:?}"),
    }
    match mat.resolve(cell_at(&mat, 2, 4)) {
        ResolvedCell::Formula(formula) => assert_eq!(formula.raw(), "=SUM(E2:E3)"),
        other => panic!("expected a formula, got {other:?}"),
    }
    match mat.resolve(cell_at(&mat, 2, 5)) {
        ResolvedCell::Formula(formula) => assert_eq!(formula.raw(), "=AVERAGE(F2:F3)"),
        other => panic!("expected a formula, got {other:?}"),
    }
}

#[test]
fn mapped_plain_strings_stay_literals() {
    let mat = players_grid();

    let label = mat.resolve(cell_at(&mat, 2, 0));
    assert_eq!(label, ResolvedCell::Literal(CellScalar::Text("TOTAL".into())));
}

#[test]
fn unmapped_cells_resolve_to_their_literal_or_nothing() {
    let mat = players_grid();

    let name = mat.resolve(cell_at(&mat, 0, 0));
    assert_eq!(name, ResolvedCell::Literal(CellScalar::Text("Mario".into())));

    let untouched = mat.resolve(cell_at(&mat, 0, 6));
    assert_eq!(untouched, ResolvedCell::Absent);
}

#[test]
fn mappings_resolve_lazily_and_repeatably() {
    let mat = players_grid();
    let cell = cell_at(&mat, 0, 5);

    // Rendering twice invokes the mapping twice with the same result.
    assert_eq!(mat.resolve(cell), mat.resolve(cell));
}
