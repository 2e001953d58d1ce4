use recwire::exp;
use recwire::ops::ListReturnType;
use recwire::{CdtContext, ExpType, RecwireError};

fn main() -> Result<(), RecwireError> {
    // 1. A plain filter: status == "active" && visits > 10
    let filter = exp::and([
        exp::eq(exp::bin_str("status"), exp::str_val("active")),
        exp::gt(exp::bin_int("visits"), exp::int_val(10)),
    ]);
    println!("filter: {} instructions", filter.len());
    println!("{:#?}", filter);

    // 2. A CDT read scoped into a nested list, validated at build time.
    let mut ctx = CdtContext::new();
    ctx.add_map_key("scores").add_list_index(0)?;
    let first_score = exp::lists::get_by_index(
        exp::bin_map("profile"),
        exp::int_val(0),
        ExpType::Auto,
        ListReturnType::VALUE,
        Some(&ctx),
    )?;
    let scoped = exp::ge(first_score, exp::int_val(100));
    println!("scoped filter: {} instructions", scoped.len());

    // 3. An invalid return-type/value-type pairing fails before any I/O.
    let err = exp::lists::get_by_index(
        exp::bin_map("profile"),
        exp::int_val(0),
        ExpType::Str,
        ListReturnType::COUNT,
        None,
    )
    .unwrap_err();
    println!("build-time rejection: {err}");

    Ok(())
}
