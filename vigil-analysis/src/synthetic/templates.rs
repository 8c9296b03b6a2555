//! Dialogue template blocks for synthetic transcripts (EN/ES).
//! Pure data: scenarios pick one greeting, body, and closing block each.

use vigil_core::model::{Language, Persona, Segment, Speaker};

use Speaker::{Agent, Customer};

/// A reusable run of turns sharing one segment label.
pub struct TemplateBlock {
    pub key: &'static str,
    pub segment: Segment,
    pub turns: &'static [(Speaker, &'static str)],
}

const fn block(
    key: &'static str,
    segment: Segment,
    turns: &'static [(Speaker, &'static str)],
) -> TemplateBlock {
    TemplateBlock {
        key,
        segment,
        turns,
    }
}

static COLLECTIONS_EN: &[TemplateBlock] = &[
    block(
        "greeting_full",
        Segment::Greeting,
        &[
            (Agent, "Thank you for calling Premier Auto Finance, this is Sarah. May I have your name please?"),
            (Customer, "Yes, this is James Miller."),
            (Agent, "Thank you, Mr. Miller. This is an attempt to collect a debt. Any information will be used for that purpose. Can you confirm the last four of your social and your date of birth so I can pull up your account?"),
            (Customer, "Sure, it's 4522 and DOB 03-15-1985."),
            (Agent, "Thank you, I've verified you. How can I help you today?"),
        ],
    ),
    block(
        "greeting_ok",
        Segment::Greeting,
        &[
            (Agent, "Thank you for calling Premier Auto Finance, this is Sarah. Who do I have the pleasure of speaking with?"),
            (Customer, "James Miller."),
            (Agent, "Thank you. Can you confirm last four of social and date of birth for security?"),
            (Customer, "4522, 03-15-85."),
            (Agent, "Thanks. I have your account. How can I help?"),
        ],
    ),
    block(
        "greeting_no_miranda_no_rpv",
        Segment::Greeting,
        &[
            (Agent, "Premier Auto Finance, this is Sarah."),
            (Customer, "Hi, I'm calling about my account."),
            (Agent, "Sure, what's the account number? I'll pull it up."),
            (Customer, "It's 789234."),
            (Agent, "I see you're past due by 45 days. The balance is $2,400. We need to get this resolved."),
        ],
    ),
    block(
        "body_accurate_recap",
        Segment::Negotiation,
        &[
            (Customer, "I want to set up a payment plan."),
            (Agent, "I can offer a payment arrangement. Your current past-due amount is $800. We can do two payments of $400 due on the 15th and 30th. Would that work?"),
            (Customer, "Yes."),
            (Agent, "Just to confirm: we've set up two payments of $400, on the 15th and 30th. You'll receive a confirmation. Is there anything else?"),
            (Customer, "No, that's it."),
        ],
    ),
    block(
        "body_no_recap",
        Segment::Negotiation,
        &[
            (Customer, "I can pay $400 next week."),
            (Agent, "I can set that up. So $400 next week. Anything else?"),
            (Customer, "No."),
            (Agent, "Thanks for calling. Bye."),
        ],
    ),
    block(
        "body_aggressive",
        Segment::Negotiation,
        &[
            (Agent, "You're 45 days past due. We need payment now or we're sending this to repossession. What are you going to do?"),
            (Customer, "I'm trying to work with you."),
            (Agent, "Then pay. When? Today?"),
            (Customer, "I can do $400 Friday."),
            (Agent, "Fine. Friday. Don't miss it."),
        ],
    ),
    block(
        "body_third_party_promises",
        Segment::Negotiation,
        &[
            (Customer, "Hi, I'm calling for my brother, he's at work. Can you tell me what he owes?"),
            (Agent, "Sure, what's his name and account number? I can look it up and see what we can do for him. I might be able to waive some fees if he calls back by Friday."),
            (Customer, "Thanks, that helps."),
        ],
    ),
    block(
        "closing_recap",
        Segment::Closing,
        &[
            (Agent, "To confirm: two payments of $400 on the 15th and 30th. You'll get a confirmation. Thank you for calling Premier Auto Finance. Have a good day."),
        ],
    ),
];

static COLLECTIONS_ES: &[TemplateBlock] = &[
    block(
        "greeting_full",
        Segment::Greeting,
        &[
            (Agent, "Gracias por llamar a Premier Auto Finance, soy María. ¿Me da su nombre por favor?"),
            (Customer, "Sí, soy Carlos Rodríguez."),
            (Agent, "Gracias, Sr. Rodríguez. Esta es una comunicación para cobrar una deuda. ¿Puede confirmar los últimos cuatro de su seguro social y su fecha de nacimiento para verificar su cuenta?"),
            (Customer, "Claro, 8899 y 20 de mayo de 1980."),
            (Agent, "Gracias, ya lo verifiqué. ¿En qué puedo ayudarle hoy?"),
        ],
    ),
    block(
        "greeting_ok",
        Segment::Greeting,
        &[
            (Agent, "Gracias por llamar a Premier Auto Finance, soy María. ¿Con quién hablo?"),
            (Customer, "Carlos Rodríguez."),
            (Agent, "¿Puede confirmar los últimos cuatro del seguro social y fecha de nacimiento?"),
            (Customer, "8899, 20 de mayo del 80."),
            (Agent, "Gracias. Tengo su cuenta. ¿En qué puedo ayudarle?"),
        ],
    ),
    block(
        "greeting_no_miranda_no_rpv",
        Segment::Greeting,
        &[
            (Agent, "Premier Auto Finance, con María."),
            (Customer, "Hola, llamo por mi cuenta."),
            (Agent, "¿Cuál es el número de cuenta?"),
            (Customer, "456123."),
            (Agent, "Veo que tiene 45 días de atraso. El saldo es $2,400. Hay que resolver esto."),
        ],
    ),
    block(
        "body_accurate_recap",
        Segment::Negotiation,
        &[
            (Customer, "Quiero hacer un plan de pagos."),
            (Agent, "Puedo ofrecerle un arreglo. El monto vencido es $800. Podemos hacer dos pagos de $400 los días 15 y 30. ¿Le funciona?"),
            (Customer, "Sí."),
            (Agent, "Quedan dos pagos de $400, el 15 y el 30. Recibirá una confirmación. ¿Algo más?"),
            (Customer, "No."),
        ],
    ),
    block(
        "body_no_recap",
        Segment::Negotiation,
        &[
            (Customer, "Puedo pagar $400 la próxima semana."),
            (Agent, "Puedo anotarlo. $400 la próxima semana. ¿Algo más?"),
            (Customer, "No."),
            (Agent, "Gracias por llamar. Adiós."),
        ],
    ),
    block(
        "body_aggressive",
        Segment::Negotiation,
        &[
            (Agent, "Tiene 45 días de atraso. Necesitamos el pago ya o enviamos a recuperación. ¿Qué va a hacer?"),
            (Customer, "Estoy tratando de cooperar."),
            (Agent, "Entonces pague. ¿Cuándo? ¿Hoy?"),
            (Customer, "Puedo dar $400 el viernes."),
            (Agent, "Bien. El viernes. No falle."),
        ],
    ),
    block(
        "closing_recap",
        Segment::Closing,
        &[
            (Agent, "Para confirmar: dos pagos de $400 los días 15 y 30. Recibirá confirmación. Gracias por llamar a Premier Auto Finance. Que tenga buen día."),
        ],
    ),
];

static RAM_EN: &[TemplateBlock] = &[
    block(
        "greeting_full",
        Segment::Greeting,
        &[
            (Agent, "Hi, this is Chris with Premier Auto Finance RAM. Who am I speaking with?"),
            (Customer, "This is Mike at Riverside Chevrolet."),
            (Agent, "Thanks, Mike. Can you confirm your dealer ID so I pull up the right account?"),
            (Customer, "Sure, it's RIV-789."),
            (Agent, "Got it. How can I help you today?"),
        ],
    ),
    block(
        "greeting_ok",
        Segment::Greeting,
        &[
            (Agent, "Premier Auto Finance RAM, this is Chris."),
            (Customer, "Hi, Mike from Riverside."),
            (Agent, "Thanks, Mike. What do you need?"),
        ],
    ),
    block(
        "body_portal_recap",
        Segment::Negotiation,
        &[
            (Customer, "I'm stuck on the portal, can't find where to upload the stips."),
            (Agent, "No problem. Go to Dealer Central, then Applications, then the application number. You'll see a link that says Upload Documents. Click that and add the stips one by one. Did that work?"),
            (Customer, "Yes, I see it."),
            (Agent, "Great. So next steps: finish uploading the stips, then hit Submit. Underwriting typically reviews within 2 business days. If anything's missing we'll reach out."),
        ],
    ),
    block(
        "body_no_recap",
        Segment::Negotiation,
        &[
            (Customer, "Where do I upload stips?"),
            (Agent, "Dealer Central, Applications, then your app number. There's an Upload Documents link."),
            (Customer, "Got it."),
            (Agent, "Okay, bye."),
        ],
    ),
    block(
        "body_overpromise",
        Segment::Negotiation,
        &[
            (Customer, "When will this get approved?"),
            (Agent, "We'll have it done by end of day today, no problem."),
            (Customer, "Great."),
            (Agent, "Yeah, you're all set. Bye."),
        ],
    ),
    block(
        "body_wrong_docs_bypass",
        Segment::Negotiation,
        &[
            (Customer, "Can I skip the proof of insurance for now?"),
            (Agent, "Yeah, sometimes we can work around that. Just submit the rest and we'll see."),
            (Customer, "And the income doc?"),
            (Agent, "Underwriting usually wants it but we've made exceptions. Try without and we'll let you know."),
        ],
    ),
    block(
        "closing_recap",
        Segment::Closing,
        &[
            (Agent, "So to summarize: upload the stips in Dealer Central under your app, then submit. We'll review within 2 business days. You have my number. Thanks, Mike."),
        ],
    ),
];

static RAM_ES: &[TemplateBlock] = &[
    block(
        "greeting_full",
        Segment::Greeting,
        &[
            (Agent, "Hola, soy Laura de Premier Auto Finance RAM. ¿Con quién hablo?"),
            (Customer, "Soy Pedro de Concesionario Norte."),
            (Agent, "Gracias, Pedro. ¿Me confirma su ID de concesionario?"),
            (Customer, "NORTE-456."),
            (Agent, "Listo. ¿En qué puedo ayudarle?"),
        ],
    ),
    block(
        "greeting_ok",
        Segment::Greeting,
        &[
            (Agent, "Premier Auto Finance RAM, con Laura."),
            (Customer, "Hola, Pedro de Concesionario Norte."),
            (Agent, "Gracias, Pedro. ¿Qué necesita?"),
        ],
    ),
    block(
        "body_portal_recap",
        Segment::Negotiation,
        &[
            (Customer, "No encuentro dónde subir los documentos en el portal."),
            (Agent, "Vaya a Centro del Concesionario, Aplicaciones, luego el número de su aplicación. Verá un enlace Subir documentos. Ahí sube los stip. ¿Le apareció?"),
            (Customer, "Sí."),
            (Agent, "Próximos pasos: suba los stip y luego Enviar. Suscripción revisa en unos 2 días hábiles. Si falta algo le contactamos."),
        ],
    ),
    block(
        "body_no_recap",
        Segment::Negotiation,
        &[
            (Customer, "¿Dónde subo los stip?"),
            (Agent, "Centro del Concesionario, Aplicaciones, su app. Ahí está Subir documentos."),
            (Customer, "Listo."),
            (Agent, "De acuerdo. Adiós."),
        ],
    ),
    block(
        "body_overpromise",
        Segment::Negotiation,
        &[
            (Customer, "¿Cuándo lo aprueban?"),
            (Agent, "Para hoy mismo lo tenemos, sin problema."),
            (Customer, "Perfecto."),
            (Agent, "Sí, quedó. Adiós."),
        ],
    ),
    block(
        "body_wrong_docs_bypass",
        Segment::Negotiation,
        &[
            (Customer, "¿Puedo omitir el seguro por ahora?"),
            (Agent, "A veces se puede. Envíe el resto y vemos."),
            (Customer, "¿Y el comprobante de ingresos?"),
            (Agent, "Suscripción suele pedirlo pero ha habido excepciones. Pruebe sin eso."),
        ],
    ),
    block(
        "closing_recap",
        Segment::Closing,
        &[
            (Agent, "Resumen: suba los stip en Centro del Concesionario y envíe. Revisamos en 2 días hábiles. Tiene mi número. Gracias, Pedro."),
        ],
    ),
];

pub fn blocks_for(persona: Persona, language: Language) -> &'static [TemplateBlock] {
    match (persona, language) {
        (Persona::Collections, Language::En) => COLLECTIONS_EN,
        (Persona::Collections, Language::Es) => COLLECTIONS_ES,
        (Persona::Ram, Language::En) => RAM_EN,
        (Persona::Ram, Language::Es) => RAM_ES,
    }
}

pub fn find_block(
    persona: Persona,
    language: Language,
    key: &str,
) -> Option<&'static TemplateBlock> {
    blocks_for(persona, language).iter().find(|b| b.key == key)
}
