//! Unit and prefix definitions - the static vocabulary the parser and
//! the conversion model query
//!
//! Every entry names a canonical atom id, its aliases (the first alias is
//! the output name), a scale factor to base units and a kind tag. Units
//! additionally list the base atoms they reduce to; a derived unit always
//! expands straight to base atoms, never through another derived unit.
//! When two entries share an alias, the later entry wins.

use std::f64::consts::PI;

/// One row of the definition table
#[derive(Debug)]
pub struct UnitDef {
    /// Canonical atom id, e.g. `<meter>`
    pub id: &'static str,
    pub aliases: &'static [&'static str],
    /// Factor to base units (prefixes: the prefix multiplier)
    pub scalar: f64,
    /// `"prefix"`, `""` for unity, a fundamental dimension, a kind name or
    /// a non-dimensional tag such as `"counting"`
    pub kind: &'static str,
    pub numerator: &'static [&'static str],
    pub denominator: &'static [&'static str],
}

impl UnitDef {
    pub fn is_prefix(&self) -> bool {
        self.kind == "prefix"
    }

    /// Output name (first alias)
    pub fn output_name(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or(self.id)
    }
}

pub const UNITY_ID: &str = "<1>";

/// Atoms every other unit reduces to
pub const BASE_UNITS: &[&str] = &[
    "<meter>",
    "<kilogram>",
    "<second>",
    "<mole>",
    "<ampere>",
    "<radian>",
    "<kelvin>",
    "<temp-K>",
    "<byte>",
    "<dollar>",
    "<candela>",
    "<each>",
    "<steradian>",
    "<decibel>",
];

const fn prefix(id: &'static str, aliases: &'static [&'static str], scalar: f64) -> UnitDef {
    UnitDef {
        id,
        aliases,
        scalar,
        kind: "prefix",
        numerator: &[],
        denominator: &[],
    }
}

const fn unit(
    id: &'static str,
    aliases: &'static [&'static str],
    scalar: f64,
    kind: &'static str,
    numerator: &'static [&'static str],
    denominator: &'static [&'static str],
) -> UnitDef {
    UnitDef {
        id,
        aliases,
        scalar,
        kind,
        numerator,
        denominator,
    }
}

const NONE: &[&str] = &[];
const ONE: &[&str] = &["<1>"];
const M: &[&str] = &["<meter>"];
const M2: &[&str] = &["<meter>", "<meter>"];
const M3: &[&str] = &["<meter>", "<meter>", "<meter>"];
const KG: &[&str] = &["<kilogram>"];
const S: &[&str] = &["<second>"];
const S2: &[&str] = &["<second>", "<second>"];
const S3: &[&str] = &["<second>", "<second>", "<second>"];
const KG_M2: &[&str] = &["<meter>", "<meter>", "<kilogram>"];
const KG_M: &[&str] = &["<kilogram>", "<meter>"];
const M_S2: &[&str] = &["<meter>", "<second>", "<second>"];
const S2_A: &[&str] = &["<second>", "<second>", "<ampere>"];
const K: &[&str] = &["<kelvin>"];
const TEMP_K: &[&str] = &["<temp-K>"];
const RAD: &[&str] = &["<radian>"];
const BYTE: &[&str] = &["<byte>"];
const EACH: &[&str] = &["<each>"];
const USD: &[&str] = &["<dollar>"];
const MOL: &[&str] = &["<mole>"];

pub static DEFINITIONS: &[UnitDef] = &[
    // prefixes
    prefix("<googol>", &["googol"], 1e100),
    prefix("<kibi>", &["Ki", "Kibi", "kibi"], 1024.0),
    prefix("<mebi>", &["Mi", "Mebi", "mebi"], 1048576.0),
    prefix("<gibi>", &["Gi", "Gibi", "gibi"], 1073741824.0),
    prefix("<tebi>", &["Ti", "Tebi", "tebi"], 1099511627776.0),
    prefix("<pebi>", &["Pi", "Pebi", "pebi"], 1125899906842624.0),
    prefix("<exi>", &["Ei", "Exi", "exi"], 1152921504606846976.0),
    prefix("<zebi>", &["Zi", "Zebi", "zebi"], 1180591620717411303424.0),
    prefix("<yebi>", &["Yi", "Yebi", "yebi"], 1208925819614629174706176.0),
    prefix("<yotta>", &["Y", "Yotta", "yotta"], 1e24),
    prefix("<zetta>", &["Z", "Zetta", "zetta"], 1e21),
    prefix("<exa>", &["E", "Exa", "exa"], 1e18),
    prefix("<peta>", &["P", "Peta", "peta"], 1e15),
    prefix("<tera>", &["T", "Tera", "tera"], 1e12),
    prefix("<giga>", &["G", "Giga", "giga"], 1e9),
    prefix("<mega>", &["M", "Mega", "mega"], 1e6),
    prefix("<kilo>", &["k", "kilo"], 1e3),
    prefix("<hecto>", &["h", "Hecto", "hecto"], 1e2),
    prefix("<deca>", &["da", "Deca", "deca", "deka"], 1e1),
    prefix("<deci>", &["d", "Deci", "deci"], 1e-1),
    prefix("<centi>", &["c", "Centi", "centi"], 1e-2),
    prefix("<milli>", &["m", "Milli", "milli"], 1e-3),
    prefix(
        "<micro>",
        &["u", "\u{03BC}", "\u{00B5}", "Micro", "mc", "micro"],
        1e-6,
    ),
    prefix("<nano>", &["n", "Nano", "nano"], 1e-9),
    prefix("<pico>", &["p", "Pico", "pico"], 1e-12),
    prefix("<femto>", &["f", "Femto", "femto"], 1e-15),
    prefix("<atto>", &["a", "Atto", "atto"], 1e-18),
    prefix("<zepto>", &["z", "Zepto", "zepto"], 1e-21),
    prefix("<yocto>", &["y", "Yocto", "yocto"], 1e-24),
    unit("<1>", &["1", "<1>"], 1.0, "", NONE, NONE),
    // length
    unit("<meter>", &["m", "meter", "meters", "metre", "metres"], 1.0, "length", M, NONE),
    unit("<inch>", &["in", "inch", "inches", "\""], 0.0254, "length", M, NONE),
    unit("<foot>", &["ft", "foot", "feet", "'"], 0.3048, "length", M, NONE),
    unit("<yard>", &["yd", "yard", "yards"], 0.9144, "length", M, NONE),
    unit("<mile>", &["mi", "mile", "miles"], 1609.344, "length", M, NONE),
    unit("<naut-mile>", &["nmi", "naut-mile"], 1852.0, "length", M, NONE),
    unit("<league>", &["league", "leagues"], 4828.0, "length", M, NONE),
    unit("<furlong>", &["furlong", "furlongs"], 201.2, "length", M, NONE),
    unit("<rod>", &["rd", "rod", "rods"], 5.029, "length", M, NONE),
    unit("<mil>", &["mil", "mils"], 0.0000254, "length", M, NONE),
    unit("<angstrom>", &["ang", "angstrom", "angstroms"], 1e-10, "length", M, NONE),
    unit("<fathom>", &["fathom", "fathoms"], 1.829, "length", M, NONE),
    unit("<pica>", &["pica", "picas"], 0.00423333333, "length", M, NONE),
    unit("<point>", &["point", "points", "pt"], 0.000352777778, "length", M, NONE),
    unit("<redshift>", &["z", "red-shift", "redshift"], 1.302773e26, "length", M, NONE),
    unit("<AU>", &["AU", "astronomical-unit"], 149597900000.0, "length", M, NONE),
    unit("<light-second>", &["ls", "light-second"], 299792500.0, "length", M, NONE),
    unit("<light-minute>", &["lmin", "light-minute"], 17987550000.0, "length", M, NONE),
    unit("<light-year>", &["ly", "light-year"], 9460528000000000.0, "length", M, NONE),
    unit("<parsec>", &["pc", "parsec", "parsecs"], 30856780000000000.0, "length", M, NONE),
    unit("<datamile>", &["DM", "datamile"], 1828.8, "length", M, NONE),
    // mass
    unit("<kilogram>", &["kg", "kilogram", "kilograms"], 1.0, "mass", KG, NONE),
    unit("<AMU>", &["u", "AMU", "amu"], 1.660538921e-27, "mass", KG, NONE),
    unit(
        "<dalton>",
        &["Da", "Dalton", "Daltons", "dalton", "daltons"],
        1.660538921e-27,
        "mass",
        KG,
        NONE,
    ),
    unit("<slug>", &["slug", "slugs"], 14.5939029, "mass", KG, NONE),
    unit("<short-ton>", &["tn", "ton", "short-ton"], 907.18474, "mass", KG, NONE),
    unit("<metric-ton>", &["t", "tonne", "metric-ton"], 1000.0, "mass", KG, NONE),
    unit("<carat>", &["ct", "carat", "carats"], 0.0002, "mass", KG, NONE),
    unit("<pound>", &["lbs", "lb", "pound", "pounds", "#"], 0.45359237, "mass", KG, NONE),
    unit("<ounce>", &["oz", "ounce", "ounces"], 0.0283495231, "mass", KG, NONE),
    unit("<gram>", &["g", "gram", "grams", "gramme", "grammes"], 1e-3, "mass", KG, NONE),
    unit("<grain>", &["grain", "grains", "gr"], 6.479891e-5, "mass", KG, NONE),
    unit("<dram>", &["dram", "drams", "dr"], 0.0017718452, "mass", KG, NONE),
    unit("<stone>", &["stone", "stones", "st"], 6.35029318, "mass", KG, NONE),
    // area
    unit("<hectare>", &["hectare"], 10000.0, "area", M2, NONE),
    unit("<acre>", &["acre", "acres"], 4046.85642, "area", M2, NONE),
    unit("<sqft>", &["sqft"], 0.09290304, "area", M2, NONE),
    // volume
    unit(
        "<liter>",
        &["l", "L", "liter", "liters", "litre", "litres"],
        0.001,
        "volume",
        M3,
        NONE,
    ),
    unit("<gallon>", &["gal", "gallon", "gallons"], 0.0037854118, "volume", M3, NONE),
    unit(
        "<gallon-imp>",
        &["galimp", "gallon-imp", "gallons-imp"],
        0.0045460900,
        "volume",
        M3,
        NONE,
    ),
    unit("<quart>", &["qt", "quart", "quarts"], 0.00094635295, "volume", M3, NONE),
    unit("<pint>", &["pt", "pint", "pints"], 0.000473176475, "volume", M3, NONE),
    unit("<pint-imp>", &["ptimp", "pint-imp", "pints-imp"], 5.6826125e-4, "volume", M3, NONE),
    unit("<cup>", &["cu", "cup", "cups"], 0.000236588238, "volume", M3, NONE),
    unit(
        "<fluid-ounce>",
        &["floz", "fluid-ounce", "fluid-ounces"],
        2.95735297e-5,
        "volume",
        M3,
        NONE,
    ),
    unit(
        "<tablespoon>",
        &["tb", "tbsp", "tbs", "tablespoon", "tablespoons"],
        1.47867648e-5,
        "volume",
        M3,
        NONE,
    ),
    unit("<teaspoon>", &["tsp", "teaspoon", "teaspoons"], 4.92892161e-6, "volume", M3, NONE),
    unit("<bushel>", &["bu", "bsh", "bushel", "bushels"], 0.035239072, "volume", M3, NONE),
    unit(
        "<oilbarrel>",
        &["bbl", "oilbarrel", "oilbarrels", "oil-barrel", "oil-barrels"],
        0.158987294928,
        "volume",
        M3,
        NONE,
    ),
    unit(
        "<beerbarrel>",
        &["bl", "bl-us", "beerbarrel", "beerbarrels", "beer-barrel", "beer-barrels"],
        0.117347765304,
        "volume",
        M3,
        NONE,
    ),
    unit(
        "<beerbarrel-imp>",
        &["blimp", "bl-imp", "beerbarrel-imp", "beerbarrels-imp", "beer-barrel-imp", "beer-barrels-imp"],
        0.16365924,
        "volume",
        M3,
        NONE,
    ),
    // speed
    unit("<kph>", &["kph"], 0.277777778, "speed", M, S),
    unit("<mph>", &["mph"], 0.44704, "speed", M, S),
    unit("<knot>", &["kt", "kn", "kts", "knot", "knots"], 0.514444444, "speed", M, S),
    unit("<fps>", &["fps"], 0.3048, "speed", M, S),
    // acceleration
    unit("<gee>", &["gee"], 9.80665, "acceleration", M, S2),
    unit("<Gal>", &["Gal"], 1e-2, "acceleration", M, S2),
    // temperature differences
    unit("<kelvin>", &["K", "degK", "kelvin", "Kelvin"], 1.0, "temperature", K, NONE),
    unit(
        "<celsius>",
        &["°C", "degC", "celsius", "Celsius", "centigrade", "Centigrade", "ºC"],
        1.0,
        "temperature",
        K,
        NONE,
    ),
    unit(
        "<fahrenheit>",
        &["°F", "degF", "fahrenheit", "Fahrenheit", "ºF"],
        5.0 / 9.0,
        "temperature",
        K,
        NONE,
    ),
    unit("<rankine>", &["°R", "degR", "rankine", "Rankine"], 5.0 / 9.0, "temperature", K, NONE),
    // absolute temperatures
    unit("<temp-K>", &["tempK", "temp-K"], 1.0, "temperature", TEMP_K, NONE),
    unit("<temp-C>", &["tempC", "temp-C"], 1.0, "temperature", TEMP_K, NONE),
    unit("<temp-F>", &["tempF", "temp-F"], 5.0 / 9.0, "temperature", TEMP_K, NONE),
    unit("<temp-R>", &["tempR", "temp-R"], 5.0 / 9.0, "temperature", TEMP_K, NONE),
    // time
    unit("<second>", &["s", "sec", "secs", "second", "seconds"], 1.0, "time", S, NONE),
    unit("<minute>", &["min", "mins", "minute", "minutes"], 60.0, "time", S, NONE),
    unit("<hour>", &["h", "hr", "hrs", "hour", "hours"], 3600.0, "time", S, NONE),
    unit("<day>", &["d", "day", "days"], 86400.0, "time", S, NONE),
    unit("<week>", &["wk", "week", "weeks"], 604800.0, "time", S, NONE),
    unit("<fortnight>", &["fortnight", "fortnights"], 1209600.0, "time", S, NONE),
    unit("<year>", &["y", "yr", "year", "years", "annum"], 31556926.0, "time", S, NONE),
    unit("<decade>", &["decade", "decades"], 315569260.0, "time", S, NONE),
    unit("<century>", &["century", "centuries"], 3155692600.0, "time", S, NONE),
    // pressure
    unit("<pascal>", &["Pa", "pascal", "Pascal"], 1.0, "pressure", KG, M_S2),
    unit("<bar>", &["bar", "bars"], 100000.0, "pressure", KG, M_S2),
    unit("<mmHg>", &["mmHg"], 133.322368, "pressure", KG, M_S2),
    unit("<inHg>", &["inHg"], 3386.3881472, "pressure", KG, M_S2),
    unit("<torr>", &["torr"], 133.322368, "pressure", KG, M_S2),
    unit("<atm>", &["atm", "ATM", "atmosphere", "atmospheres"], 101325.0, "pressure", KG, M_S2),
    unit("<psi>", &["psi"], 6894.76, "pressure", KG, M_S2),
    unit("<cmh2o>", &["cmH2O", "cmh2o"], 98.0638, "pressure", KG, M_S2),
    unit("<inh2o>", &["inH2O", "inh2o"], 249.082052, "pressure", KG, M_S2),
    // viscosity
    unit("<poise>", &["P", "poise"], 0.1, "viscosity", KG, &["<meter>", "<second>"]),
    unit("<stokes>", &["St", "stokes"], 1e-4, "viscosity", M2, S),
    // substance
    unit("<mole>", &["mol", "mole"], 1.0, "substance", MOL, NONE),
    // concentration
    unit("<molar>", &["M", "molar"], 1000.0, "molar_concentration", MOL, M3),
    unit("<wtpercent>", &["wt%", "wtpercent"], 10.0, "molar_concentration", KG, M3),
    // activity
    unit("<katal>", &["kat", "katal", "Katal"], 1.0, "activity", MOL, S),
    unit("<unit>", &["U", "enzUnit", "unit"], 16.667e-16, "activity", MOL, S),
    // capacitance
    unit(
        "<farad>",
        &["F", "farad", "Farad"],
        1.0,
        "capacitance",
        &["<second>", "<second>", "<second>", "<second>", "<ampere>", "<ampere>"],
        KG_M2,
    ),
    // charge
    unit("<coulomb>", &["C", "coulomb", "Coulomb"], 1.0, "charge", &["<ampere>", "<second>"], NONE),
    unit("<Ah>", &["Ah"], 3600.0, "charge", &["<ampere>", "<second>"], NONE),
    // current
    unit(
        "<ampere>",
        &["A", "Ampere", "ampere", "amp", "amps"],
        1.0,
        "current",
        &["<ampere>"],
        NONE,
    ),
    // conductance
    unit(
        "<siemens>",
        &["S", "Siemens", "siemens"],
        1.0,
        "conductance",
        &["<second>", "<second>", "<second>", "<ampere>", "<ampere>"],
        &["<kilogram>", "<meter>", "<meter>"],
    ),
    // inductance
    unit(
        "<henry>",
        &["H", "Henry", "henry"],
        1.0,
        "inductance",
        KG_M2,
        &["<second>", "<second>", "<ampere>", "<ampere>"],
    ),
    // potential
    unit(
        "<volt>",
        &["V", "Volt", "volt", "volts"],
        1.0,
        "potential",
        KG_M2,
        &["<second>", "<second>", "<second>", "<ampere>"],
    ),
    // resistance
    unit(
        "<ohm>",
        &["Ohm", "ohm", "\u{03A9}", "\u{2126}"],
        1.0,
        "resistance",
        KG_M2,
        &["<second>", "<second>", "<second>", "<ampere>", "<ampere>"],
    ),
    // magnetism
    unit("<weber>", &["Wb", "weber", "webers"], 1.0, "magnetism", KG_M2, S2_A),
    unit("<tesla>", &["T", "tesla", "teslas"], 1.0, "magnetism", KG, S2_A),
    unit("<gauss>", &["G", "gauss"], 1e-4, "magnetism", KG, S2_A),
    unit("<maxwell>", &["Mx", "maxwell", "maxwells"], 1e-8, "magnetism", KG_M2, S2_A),
    unit(
        "<oersted>",
        &["Oe", "oersted", "oersteds"],
        250.0 / PI,
        "magnetism",
        &["<ampere>"],
        M,
    ),
    // energy
    unit(
        "<joule>",
        &["J", "joule", "Joule", "joules", "Joules"],
        1.0,
        "energy",
        KG_M2,
        S2,
    ),
    unit("<erg>", &["erg", "ergs"], 1e-7, "energy", KG_M2, S2),
    unit("<btu>", &["BTU", "btu", "BTUs"], 1055.056, "energy", KG_M2, S2),
    unit("<calorie>", &["cal", "calorie", "calories"], 4.18400, "energy", KG_M2, S2),
    unit("<Calorie>", &["Cal", "Calorie", "Calories"], 4184.00, "energy", KG_M2, S2),
    unit(
        "<therm-US>",
        &["th", "therm", "therms", "Therm", "therm-US"],
        105480400.0,
        "energy",
        KG_M2,
        S2,
    ),
    unit("<Wh>", &["Wh"], 3600.0, "energy", KG_M2, S2),
    unit(
        "<electronvolt>",
        &["eV", "electronvolt", "electronvolts"],
        1.602176634e-19,
        "energy",
        KG_M2,
        S2,
    ),
    // force
    unit("<newton>", &["N", "Newton", "newton"], 1.0, "force", KG_M, S2),
    unit("<dyne>", &["dyn", "dyne"], 1e-5, "force", KG_M, S2),
    unit("<pound-force>", &["lbf", "pound-force"], 4.448222, "force", KG_M, S2),
    // frequency
    unit("<hertz>", &["Hz", "hertz", "Hertz"], 1.0, "frequency", ONE, S),
    // angle
    unit("<radian>", &["rad", "radian", "radians"], 1.0, "angle", RAD, NONE),
    unit("<degree>", &["deg", "degree", "degrees"], PI / 180.0, "angle", RAD, NONE),
    unit(
        "<arcminute>",
        &["arcmin", "arcminute", "arcminutes"],
        PI / 10800.0,
        "angle",
        RAD,
        NONE,
    ),
    unit(
        "<arcsecond>",
        &["arcsec", "arcsecond", "arcseconds"],
        PI / 648000.0,
        "angle",
        RAD,
        NONE,
    ),
    unit("<gradian>", &["gon", "grad", "gradian", "grads"], PI / 200.0, "angle", RAD, NONE),
    unit(
        "<steradian>",
        &["sr", "steradian", "steradians"],
        1.0,
        "solid_angle",
        &["<steradian>"],
        NONE,
    ),
    // rotation
    unit("<rotation>", &["rotation"], 2.0 * PI, "angle", RAD, NONE),
    unit("<rpm>", &["rpm"], 2.0 * PI / 60.0, "angular_velocity", RAD, S),
    // information
    unit("<byte>", &["B", "byte", "bytes"], 1.0, "information", BYTE, NONE),
    unit("<bit>", &["b", "bit", "bits"], 0.125, "information", BYTE, NONE),
    // information rate
    unit("<Bps>", &["Bps"], 1.0, "information_rate", BYTE, S),
    unit("<bps>", &["bps"], 0.125, "information_rate", BYTE, S),
    // currency
    unit("<dollar>", &["USD", "dollar"], 1.0, "currency", USD, NONE),
    unit("<cents>", &["cents"], 0.01, "currency", USD, NONE),
    // luminosity
    unit("<candela>", &["cd", "candela"], 1.0, "luminosity", &["<candela>"], NONE),
    unit(
        "<lumen>",
        &["lm", "lumen"],
        1.0,
        "luminous_power",
        &["<candela>", "<steradian>"],
        NONE,
    ),
    unit("<lux>", &["lux"], 1.0, "illuminance", &["<candela>", "<steradian>"], M2),
    // power
    unit("<watt>", &["W", "watt", "watts"], 1.0, "power", KG_M2, S3),
    unit("<volt-ampere>", &["VA", "volt-ampere"], 1.0, "power", KG_M2, S3),
    unit(
        "<volt-ampere-reactive>",
        &["var", "Var", "VAr", "VAR", "volt-ampere-reactive"],
        1.0,
        "power",
        KG_M2,
        S3,
    ),
    unit("<horsepower>", &["hp", "horsepower"], 745.699872, "power", KG_M2, S3),
    // radiation
    unit("<gray>", &["Gy", "gray", "grays"], 1.0, "radiation", M2, S2),
    unit("<roentgen>", &["R", "roentgen"], 0.009330, "radiation", M2, S2),
    unit("<sievert>", &["Sv", "sievert", "sieverts"], 1.0, "radiation", M2, S2),
    unit("<becquerel>", &["Bq", "becquerel", "becquerels"], 1.0, "radiation", ONE, S),
    unit("<curie>", &["Ci", "curie", "curies"], 3.7e10, "radiation", ONE, S),
    // counting rates
    unit("<cpm>", &["cpm"], 1.0 / 60.0, "rate", EACH, S),
    unit("<dpm>", &["dpm"], 1.0 / 60.0, "rate", EACH, S),
    unit("<bpm>", &["bpm"], 1.0 / 60.0, "rate", EACH, S),
    // resolution
    unit("<dot>", &["dot", "dots"], 1.0, "resolution", EACH, NONE),
    unit("<pixel>", &["pixel", "px"], 1.0, "resolution", EACH, NONE),
    unit("<ppi>", &["ppi"], 1.0 / 0.0254, "resolution", EACH, M),
    unit("<dpi>", &["dpi"], 1.0 / 0.0254, "typography", EACH, M),
    // counting and ratios
    unit("<cell>", &["cells", "cell"], 1.0, "counting", EACH, NONE),
    unit("<each>", &["each"], 1.0, "counting", EACH, NONE),
    unit("<count>", &["count"], 1.0, "counting", EACH, NONE),
    unit("<base-pair>", &["bp", "base-pair"], 1.0, "counting", EACH, NONE),
    unit("<nucleotide>", &["nt", "nucleotide"], 1.0, "counting", EACH, NONE),
    unit("<molecule>", &["molecule", "molecules"], 1.0, "counting", ONE, NONE),
    unit("<dozen>", &["doz", "dozen"], 12.0, "prefix_only", EACH, NONE),
    unit("<percent>", &["%", "percent"], 0.01, "prefix_only", ONE, NONE),
    unit("<ppm>", &["ppm"], 1e-6, "prefix_only", ONE, NONE),
    unit("<ppb>", &["ppb"], 1e-9, "prefix_only", ONE, NONE),
    unit("<ppt>", &["ppt"], 1e-12, "prefix_only", ONE, NONE),
    unit("<gross>", &["gr", "gross"], 144.0, "prefix_only", EACH, NONE),
    unit("<decibel>", &["dB", "decibel", "decibels"], 1.0, "logarithmic", &["<decibel>"], NONE),
];
