use criterion::{Criterion, criterion_group, criterion_main};
use formwork_dom::{Element, elem};
use formwork_loader::{Builder, GraphResolver, GraphToolkit};

/// A form with `rows * cols` labelled buttons in one grid layout.
fn grid_document(rows: usize, cols: usize) -> Element {
    let mut layout = elem("layout")
        .with_attr("class", "QGridLayout")
        .with_attr("name", "grid");
    for row in 0..rows {
        for col in 0..cols {
            let widget = elem("widget")
                .with_attr("class", "QPushButton")
                .with_attr("name", format!("button_{row}_{col}"))
                .with_child(
                    elem("property").with_attr("name", "text").with_child(
                        elem("string").with_text(format!("Button {row}:{col}")),
                    ),
                );
            layout = layout.with_child(
                elem("item")
                    .with_attr("row", row.to_string())
                    .with_attr("column", col.to_string())
                    .with_child(widget),
            );
        }
    }
    elem("ui").with_attr("version", "4.0").with_child(
        elem("widget")
            .with_attr("class", "QWidget")
            .with_attr("name", "Form")
            .with_child(layout),
    )
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_grid_20x20", |b| {
        let template = grid_document(20, 20);
        b.iter(|| {
            let mut doc = template.clone();
            let mut builder = Builder::new(GraphToolkit::new(), GraphResolver::new());
            builder.build(&mut doc).expect("build")
        })
    });
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
