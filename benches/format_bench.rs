use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SIMPLE: &str = "select id, name from users where active = 1 order by name";

const COMPLEX: &str = "\
select o.id, c.name,
case when count(*) = 1 then 'One-time' when count(*) < 10 then 'Repeat' else 'Loyal' end as tier,
avg(o.total) as avg_total
from orders as o
left outer join customers as c on o.customer_id = c.id
where o.created_at between '2024-01-01' and '2024-12-31'
and o.status in (select status from valid_statuses)
group by o.id, c.name
having count(*) > 1
order by avg_total desc";

fn bench_format(c: &mut Criterion) {
    c.bench_function("format_simple", |b| {
        b.iter(|| sqlriver::format_string(black_box(SIMPLE)).unwrap())
    });

    c.bench_function("format_complex", |b| {
        b.iter(|| sqlriver::format_string(black_box(COMPLEX)).unwrap())
    });

    let batch = COMPLEX.to_string() + ";\n";
    let large = batch.repeat(50);
    c.bench_function("format_large_batch", |b| {
        b.iter(|| sqlriver::format_string(black_box(&large)).unwrap())
    });

    c.bench_function("lex_complex", |b| {
        b.iter(|| sqlriver::lexer::tokenize(black_box(COMPLEX)))
    });
}

criterion_group!(benches, bench_format);
criterion_main!(benches);
