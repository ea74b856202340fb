use super::{Category, SlangEntry};

fn entry(
    id: &str,
    term: &str,
    definition: &str,
    example: &str,
    category: Category,
    origin: &str,
    synonyms: &[&str],
) -> SlangEntry {
    SlangEntry {
        id: id.to_string(),
        term: term.to_string(),
        definition: definition.to_string(),
        example: example.to_string(),
        category,
        origin: Some(origin.to_string()),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
    }
}

/// Authored entries, in display order. Append only.
pub(super) fn entries() -> Vec<SlangEntry> {
    use Category::*;

    vec![
        entry(
            "1",
            "Mambo",
            "Coisa, assunto, situação ou objeto indefinido.",
            "Aquele mambo que me contaste ontem é verdade?",
            Everyday,
            "Luanda",
            &["Cena", "Assunto"],
        ),
        entry(
            "2",
            "Bwé",
            "Muito, em grande quantidade.",
            "A festa estava bwé de fixe!",
            Youth,
            "Geral",
            &["Muito", "Bastante"],
        ),
        entry(
            "3",
            "Kamba",
            "Amigo, companheiro próximo.",
            "Esse é meu kamba de infância.",
            Street,
            "Luanda",
            &["Amigo", "Sócio", "Pitéu"],
        ),
        entry(
            "4",
            "Bater a bota",
            "Morrer ou ir embora de algum lugar.",
            "Se não comeres, vais bater a bota.",
            Street,
            "Geral",
            &[],
        ),
        entry(
            "5",
            "Ginguba",
            "Amendoim.",
            "Compra ali um pacote de ginguba para nós.",
            Everyday,
            "Nacional",
            &[],
        ),
        entry(
            "6",
            "Pala",
            "Fome ou problema/confusão (depende do contexto).",
            "Estou com uma pala que não aguento.",
            Street,
            "Luanda",
            &[],
        ),
        entry(
            "7",
            "Catanar",
            "Conseguir algo com esforço ou astúcia; desenrascar.",
            "Vou tentar catanar boleia para o centro.",
            Youth,
            "Sul de Angola",
            &[],
        ),
        entry(
            "8",
            "Dica",
            "Conversa, assunto ou conselho.",
            "Qual é a dica de hoje?",
            Youth,
            "Luanda",
            &[],
        ),
        entry(
            "9",
            "Kota",
            "Pessoa mais velha, respeitável; pai ou mãe.",
            "O meu kota não me deixa sair hoje.",
            Family,
            "Geral",
            &[],
        ),
        entry(
            "10",
            "Wé",
            "Interjeição usada para chamar atenção ou expressar espanto (tu).",
            "Wé, não faz isso!",
            Street,
            "Luanda",
            &[],
        ),
        entry(
            "11",
            "Nuvens",
            "Estar distraído, fora da realidade.",
            "Tu vives nas nuvens, acorda para a vida.",
            Humor,
            "Geral",
            &[],
        ),
        entry(
            "12",
            "Bangar",
            "Ostentar, mostrar que tem dinheiro ou estilo; vaidade.",
            "Ele gosta muito de bangar com o carro novo.",
            Youth,
            "Luanda",
            &[],
        ),
        entry(
            "13",
            "Maka",
            "Problema, confusão, situação difícil.",
            "Houve muita maka no trânsito hoje.",
            Everyday,
            "Geral (Kimbundu)",
            &[],
        ),
        entry(
            "14",
            "Xuxuado",
            "Algo de má qualidade, falso ou em mau estado.",
            "Esse telefone que compraste é xuxuado.",
            Street,
            "Luanda",
            &[],
        ),
        entry(
            "15",
            "Arrocha",
            "Festa animada, dança ou confusão.",
            "O arrocha ontem foi até de manhã.",
            Music,
            "Benguela",
            &[],
        ),
        entry(
            "16",
            "Candongueiro",
            "Táxi coletivo, normalmente uma carrinha azul e branca.",
            "Apanhei o candongueiro até ao Roque Santeiro.",
            Everyday,
            "Luanda",
            &["Azul e branco"],
        ),
        entry(
            "17",
            "Zungueira",
            "Vendedora ambulante que percorre as ruas com a mercadoria à cabeça.",
            "A zungueira passou aqui com fruta fresca.",
            Street,
            "Luanda",
            &[],
        ),
        entry(
            "18",
            "Kuduro",
            "Género musical e dança de batida acelerada nascido nos musseques.",
            "Hoje à noite é só kuduro na boda.",
            Music,
            "Luanda",
            &[],
        ),
        entry(
            "19",
            "Boda",
            "Festa, celebração com muita gente.",
            "No sábado vai haver boda lá em casa.",
            Music,
            "Geral",
            &["Farra", "Festa"],
        ),
        entry(
            "20",
            "Mwangolé",
            "Angolano; pessoa com orgulho da sua terra.",
            "Sou mwangolé de gema!",
            Youth,
            "Geral",
            &["Angolano"],
        ),
        entry(
            "21",
            "Tás fixe?",
            "Cumprimento informal: estás bem?",
            "Então kamba, tás fixe?",
            Greetings,
            "Geral",
            &["Tudo bem?"],
        ),
        entry(
            "22",
            "Muadié",
            "Forma de tratamento entre amigos, equivalente a \"mano\" ou \"pá\".",
            "Muadié, anda cá ver isto.",
            Greetings,
            "Luanda",
            &["Mano"],
        ),
    ]
}
