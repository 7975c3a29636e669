//! Léxico estático ciudad → código IATA.
//!
//! Sólo coincidencias exactas tras normalizar (minúsculas + trim). Una ciudad
//! desconocida devuelve cadena vacía, nunca el texto original.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::debug;

const CITY_AIRPORTS: &[(&str, &str)] = &[
    // Estados Unidos
    ("chicago", "ORD"), ("new york", "JFK"), ("nyc", "JFK"), ("manhattan", "JFK"),
    ("los angeles", "LAX"), ("la", "LAX"), ("san francisco", "SFO"), ("sf", "SFO"),
    ("miami", "MIA"), ("vegas", "LAS"), ("las vegas", "LAS"), ("seattle", "SEA"),
    ("boston", "BOS"), ("denver", "DEN"), ("atlanta", "ATL"), ("phoenix", "PHX"),
    ("dallas", "DFW"), ("houston", "IAH"), ("orlando", "MCO"), ("tampa", "TPA"),
    ("san diego", "SAN"), ("portland", "PDX"), ("minneapolis", "MSP"), ("detroit", "DTW"),
    ("philadelphia", "PHL"), ("washington", "DCA"), ("dc", "DCA"), ("baltimore", "BWI"),
    ("nashville", "BNA"), ("memphis", "MEM"), ("new orleans", "MSY"), ("kansas city", "MCI"),
    ("cleveland", "CLE"), ("pittsburgh", "PIT"), ("cincinnati", "CVG"), ("columbus", "CMH"),
    ("sacramento", "SMF"), ("san jose", "SJC"), ("oakland", "OAK"), ("reno", "RNO"),
    ("salt lake city", "SLC"), ("albuquerque", "ABQ"), ("el paso", "ELP"), ("tucson", "TUS"),
    ("jacksonville", "JAX"), ("fort lauderdale", "FLL"), ("west palm beach", "PBI"),
    ("charlotte", "CLT"), ("raleigh", "RDU"), ("richmond", "RIC"), ("norfolk", "ORF"),
    ("charleston", "CHS"), ("savannah", "SAV"), ("birmingham", "BHM"), ("mobile", "MOB"),
    ("little rock", "LIT"), ("tulsa", "TUL"), ("oklahoma city", "OKC"), ("wichita", "ICT"),
    ("omaha", "OMA"), ("des moines", "DSM"), ("milwaukee", "MKE"), ("madison", "MSN"),
    ("grand rapids", "GRR"), ("indianapolis", "IND"), ("louisville", "SDF"), ("buffalo", "BUF"),
    ("rochester", "ROC"), ("syracuse", "SYR"), ("albany", "ALB"), ("burlington", "BTV"),
    ("portland maine", "PWM"), ("manchester", "MHT"), ("providence", "PVD"), ("hartford", "BDL"),
    // Europa
    ("london", "LHR"), ("paris", "CDG"), ("tokyo", "NRT"), ("dubai", "DXB"),
    ("amsterdam", "AMS"), ("rome", "FCO"), ("madrid", "MAD"), ("barcelona", "BCN"),
    ("frankfurt", "FRA"), ("munich", "MUC"), ("berlin", "BER"), ("zurich", "ZUR"),
    ("vienna", "VIE"), ("brussels", "BRU"), ("copenhagen", "CPH"), ("stockholm", "ARN"),
    ("oslo", "OSL"), ("helsinki", "HEL"), ("reykjavik", "KEF"), ("dublin", "DUB"),
    ("edinburgh", "EDI"), ("manchester uk", "MAN"), ("glasgow", "GLA"),
    ("milan", "MXP"), ("venice", "VCE"), ("florence", "FLR"), ("naples", "NAP"),
    ("lisbon", "LIS"), ("porto", "OPO"), ("istanbul", "IST"), ("athens", "ATH"),
    ("moscow", "SVO"), ("st petersburg", "LED"), ("budapest", "BUD"), ("prague", "PRG"),
    ("warsaw", "WAW"), ("krakow", "KRK"), ("bucharest", "OTP"), ("sofia", "SOF"),
    ("zagreb", "ZAG"), ("belgrade", "BEG"), ("sarajevo", "SJJ"), ("skopje", "SKP"),
    // Asia-Pacífico
    ("sydney", "SYD"), ("melbourne", "MEL"), ("brisbane", "BNE"), ("perth", "PER"),
    ("auckland", "AKL"), ("wellington", "WLG"), ("christchurch", "CHC"),
    ("singapore", "SIN"), ("kuala lumpur", "KUL"), ("bangkok", "BKK"), ("manila", "MNL"),
    ("jakarta", "CGK"), ("ho chi minh", "SGN"), ("hanoi", "HAN"), ("phnom penh", "PNH"),
    ("yangon", "RGN"), ("colombo", "CMB"), ("dhaka", "DAC"), ("kathmandu", "KTM"),
    ("hong kong", "HKG"), ("macau", "MFM"), ("taipei", "TPE"), ("seoul", "ICN"),
    ("busan", "PUS"), ("osaka", "KIX"), ("nagoya", "NGO"), ("fukuoka", "FUK"),
    ("sapporo", "CTS"), ("beijing", "PEK"), ("shanghai", "PVG"), ("guangzhou", "CAN"),
    ("shenzhen", "SZX"), ("chengdu", "CTU"), ("xi'an", "XIY"),
    // Canadá
    ("toronto", "YYZ"), ("vancouver", "YVR"), ("montreal", "YUL"), ("calgary", "YYC"),
    ("ottawa", "YOW"), ("edmonton", "YEG"), ("winnipeg", "YWG"), ("halifax", "YHZ"),
    ("quebec city", "YQB"), ("saskatoon", "YXE"), ("regina", "YQR"), ("victoria", "YYJ"),
    // México y Centroamérica
    ("mexico city", "MEX"), ("cancun", "CUN"), ("guadalajara", "GDL"), ("monterrey", "MTY"),
    ("puerto vallarta", "PVR"), ("cabo", "SJD"), ("mazatlan", "MZT"), ("tijuana", "TIJ"),
    ("guatemala city", "GUA"), ("san jose costa rica", "SJO"), ("panama city", "PTY"),
    // Sudamérica
    ("lima", "LIM"), ("bogota", "BOG"), ("medellin", "MDE"), ("cartagena", "CTG"),
    ("quito", "UIO"), ("guayaquil", "GYE"), ("caracas", "CCS"), ("la paz", "LPB"),
    ("santa cruz", "VVI"), ("sao paulo", "GRU"), ("rio de janeiro", "GIG"),
    ("brasilia", "BSB"), ("salvador", "SSA"), ("recife", "REC"), ("fortaleza", "FOR"),
    ("buenos aires", "EZE"), ("cordoba", "COR"), ("mendoza", "MDZ"), ("santiago", "SCL"),
    ("montevideo", "MVD"), ("asuncion", "ASU"),
    // África y Oriente Medio
    ("cairo", "CAI"), ("casablanca", "CMN"), ("marrakech", "RAK"), ("tunis", "TUN"),
    ("algiers", "ALG"), ("lagos", "LOS"), ("accra", "ACC"), ("nairobi", "NBO"),
    ("addis ababa", "ADD"), ("johannesburg", "JNB"), ("cape town", "CPT"), ("durban", "DUR"),
    ("tel aviv", "TLV"), ("amman", "AMM"), ("beirut", "BEY"), ("kuwait city", "KWI"),
    ("doha", "DOH"), ("abu dhabi", "AUH"), ("muscat", "MCT"), ("riyadh", "RUH"),
    ("jeddah", "JED"), ("tehran", "IKA"), ("baghdad", "BGW"), ("erbil", "EBL"),
    // India y Asia del Sur
    ("mumbai", "BOM"), ("delhi", "DEL"), ("bangalore", "BLR"), ("chennai", "MAA"),
    ("kolkata", "CCU"), ("hyderabad", "HYD"), ("pune", "PNQ"), ("ahmedabad", "AMD"),
    ("kochi", "COK"), ("trivandrum", "TRV"), ("goa", "GOI"), ("jaipur", "JAI"),
    ("lucknow", "LKO"), ("varanasi", "VNS"), ("amritsar", "ATQ"), ("chandigarh", "IXC"),
    ("islamabad", "ISB"), ("karachi", "KHI"), ("lahore", "LHE"), ("peshawar", "PEW"),
];

static LEXICON: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CITY_AIRPORTS.iter().copied().collect());

/// Resuelve el nombre de una ciudad a su código IATA, o `""` si no está mapeada.
pub fn lookup(city_name: &str) -> &'static str {
    let clean = city_name.trim().to_lowercase();
    if clean.is_empty() {
        return "";
    }
    match LEXICON.get(clean.as_str()) {
        Some(code) => {
            debug!("Ciudad mapeada: \"{clean}\" → {code}");
            code
        }
        None => {
            debug!("Ciudad desconocida: \"{clean}\"");
            ""
        }
    }
}

/// Número de entradas del léxico.
pub fn len() -> usize {
    LEXICON.len()
}
