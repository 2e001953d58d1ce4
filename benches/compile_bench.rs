use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recwire::exp;
use recwire::ops::ListReturnType;
use recwire::{CdtContext, ExpType};

fn bench_build_expressions(c: &mut Criterion) {
    c.bench_function("comparison", |b| {
        b.iter(|| exp::eq(exp::bin_int(black_box("a")), exp::int_val(black_box(5))))
    });

    c.bench_function("logical_tree", |b| {
        b.iter(|| {
            exp::and([
                exp::eq(exp::bin_str("method"), exp::str_val("GET")),
                exp::or([
                    exp::eq(exp::bin_int("port"), exp::int_val(80)),
                    exp::eq(exp::bin_int("port"), exp::int_val(443)),
                ]),
                exp::gt(exp::bin_int("status"), exp::int_val(0)),
            ])
        })
    });

    let mut ctx = CdtContext::new();
    ctx.add_map_key("inner").add_list_index(0).unwrap();
    c.bench_function("cdt_read_with_context", |b| {
        b.iter(|| {
            exp::lists::get_by_index(
                exp::bin_list(black_box("tags")),
                exp::int_val(2),
                ExpType::Auto,
                ListReturnType::VALUE,
                Some(&ctx),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_build_expressions);
criterion_main!(benches);
